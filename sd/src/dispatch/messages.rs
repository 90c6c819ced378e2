//! Request and outcome types for the dispatch coordinator

use tokio::sync::oneshot;

use crate::sink::DumpSink;

/// Work submitted to the designated stack module's execution context.
#[derive(Debug)]
pub enum ModuleRequest {
    /// Run the module's own dump, then satisfy `done` exactly once.
    Dump {
        sink: DumpSink,
        args: Vec<String>,
        done: oneshot::Sender<()>,
    },

    /// Stop the module host task.
    Shutdown,
}

/// Terminal states of one dump cycle, as seen by the caller.
///
/// A module that accepts a submission but never signals completion has no
/// variant here: that path panics (see [`Dispatcher::dump`]), because a hung
/// diagnostics path means the module's own context is deadlocked.
///
/// [`Dispatcher::dump`]: super::Dispatcher::dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpOutcome {
    /// Local callbacks ran and the stack module signaled completion in time.
    Completed,

    /// Local callbacks ran but the stack module is not loaded or started.
    /// Reported on the sink; not an error.
    ModuleUnavailable,
}
