//! Main dump-cycle orchestration

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::config::DispatchConfig;
use super::messages::DumpOutcome;
use super::module::ModuleHandle;
use crate::registry::DumpRegistry;
use crate::sink::DumpSink;

/// Tag prefixed to the coordinator's own output lines.
const MODULE_TAG: &str = "stackdump::dispatch";

/// Orchestrates one full dump cycle.
///
/// A cycle runs every registered callback synchronously on the calling
/// context, then crosses onto the designated stack module's context for its
/// dump and waits for the completion signal under a bounded timeout.
pub struct Dispatcher {
    registry: Arc<DumpRegistry>,
    module: ModuleHandle,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher over the shared registry and the designated
    /// module's submission handle.
    pub fn new(registry: Arc<DumpRegistry>, module: ModuleHandle, config: DispatchConfig) -> Self {
        Self {
            registry,
            module,
            config,
        }
    }

    /// Run one dump cycle, writing all diagnostic text to `sink`.
    ///
    /// Local callbacks finish in their entirety before the cross-context
    /// submission begins, so local text always precedes module text on the
    /// sink. Each call creates a fresh completion signal; the module
    /// satisfies it exactly once.
    ///
    /// An unavailable module is an expected condition: a note is written to
    /// the sink and the call returns normally. Callback panics are not
    /// caught; callbacks are trusted internal diagnostic code.
    ///
    /// # Panics
    ///
    /// If the module accepts the submission but does not signal completion
    /// within the configured bound. A hung diagnostics path means the
    /// module's own context is deadlocked, which is worse than the dump
    /// request itself, so this does not degrade gracefully.
    pub async fn dump(&self, sink: &DumpSink, args: &[String]) -> DumpOutcome {
        debug!(?args, "Dispatcher::dump: called");

        let count = self.registry.len();
        if count == 0 {
            sink.line(format!("{MODULE_TAG} no registered dump targets"));
        } else {
            sink.line(format!("{MODULE_TAG} dumping registered targets: {count}"));
            self.registry.for_each(|callback| callback(sink, args));
        }

        let (done_tx, done_rx) = oneshot::channel();
        if let Err(e) = self.module.submit(sink.clone(), args.to_vec(), done_tx).await {
            warn!("Dispatcher::dump: submission failed: {}", e);
            sink.line(format!("{MODULE_TAG} NOTE: stack module not loaded or started"));
            return DumpOutcome::ModuleUnavailable;
        }

        debug!("Dispatcher::dump: awaiting module completion");
        match tokio::time::timeout(self.config.module_timeout(), done_rx).await {
            Ok(Ok(())) => {
                debug!("Dispatcher::dump: module completed");
                DumpOutcome::Completed
            }
            Ok(Err(_)) => {
                panic!("stack module dropped its completion signal without dumping")
            }
            Err(_) => {
                panic!(
                    "timed out after {:?} waiting for the stack module dump to complete",
                    self.config.module_timeout()
                )
            }
        }
    }
}
