//! Dump dispatch across execution contexts
//!
//! One dump cycle runs in two places: every registered subsystem callback on
//! the triggering context, then the designated stack module on its own
//! context. The two contexts are joined by exactly one synchronization point
//! per cycle: a fresh one-shot completion signal awaited under a bounded
//! timeout.

mod config;
mod core;
mod messages;
mod module;

pub use config::DispatchConfig;
pub use core::Dispatcher;
pub use messages::{DumpOutcome, ModuleRequest};
pub use module::{ModuleHandle, ModuleHost, StackModule, SubmitError};
