//! Execution context for the designated stack module
//!
//! The module runs on its own task with a run loop fed by an mpsc channel,
//! the same shape as the stack's other long-lived tasks. Dump requests cross
//! onto that task; the host satisfies the completion signal after the
//! module's dump returns, exactly once by construction.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::config::DispatchConfig;
use super::messages::ModuleRequest;
use crate::sink::DumpSink;

/// The designated long-lived stack module.
///
/// Implementors only describe their own state; scheduling and completion
/// signaling are the host's job.
#[async_trait]
pub trait StackModule: Send + 'static {
    /// Write this module's diagnostic text to `sink`.
    async fn dump(&mut self, sink: &DumpSink, args: &[String]);
}

/// Submission to the module's context failed.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The host task has exited or was never started. This is the expected
    /// "module not loaded" condition, not a bug.
    #[error("stack module not loaded or started")]
    NotRunning,
}

/// Owns the request channel for the module's execution context.
pub struct ModuleHost {
    tx: mpsc::Sender<ModuleRequest>,
    rx: mpsc::Receiver<ModuleRequest>,
}

impl ModuleHost {
    /// Create a host with the configured channel depth.
    pub fn new(config: &DispatchConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_buffer);
        Self { tx, rx }
    }

    /// Get a submission handle for this host.
    pub fn handle(&self) -> ModuleHandle {
        debug!("ModuleHost::handle: called");
        ModuleHandle { tx: self.tx.clone() }
    }

    /// Run the module's context until shutdown.
    ///
    /// This consumes the host and becomes the module's run loop; spawn it on
    /// a dedicated task. Requests are serviced sequentially, so every dump
    /// executes on the module's own context.
    pub async fn run<M: StackModule>(mut self, mut module: M) {
        info!("Stack module context started");

        while let Some(req) = self.rx.recv().await {
            match req {
                ModuleRequest::Dump { sink, args, done } => {
                    debug!(?args, "ModuleHost::run: dump request");
                    module.dump(&sink, &args).await;

                    // The waiter may already have given up on a slow dump.
                    let _ = done.send(());
                }

                ModuleRequest::Shutdown => {
                    info!("Stack module context shutting down");
                    break;
                }
            }
        }

        info!("Stack module context stopped");
    }
}

/// Clonable handle for submitting work to the module's context.
#[derive(Clone)]
pub struct ModuleHandle {
    tx: mpsc::Sender<ModuleRequest>,
}

impl ModuleHandle {
    /// Submit a dump request to the module's context.
    ///
    /// On success the module's context will run its dump and then satisfy
    /// `done` exactly once.
    pub async fn submit(
        &self,
        sink: DumpSink,
        args: Vec<String>,
        done: oneshot::Sender<()>,
    ) -> Result<(), SubmitError> {
        debug!("ModuleHandle::submit: called");
        self.tx
            .send(ModuleRequest::Dump { sink, args, done })
            .await
            .map_err(|_| SubmitError::NotRunning)
    }

    /// Ask the module's context to stop.
    pub async fn shutdown(&self) -> Result<(), SubmitError> {
        debug!("ModuleHandle::shutdown: called");
        self.tx
            .send(ModuleRequest::Shutdown)
            .await
            .map_err(|_| SubmitError::NotRunning)
    }
}
