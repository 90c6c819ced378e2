//! stackdump - diagnostic dump coordination for the stack runtime
//!
//! Independently-initialized subsystems register a callback that emits
//! human-readable diagnostic text; an external diagnostic-collection request
//! invokes every registered callback and additionally obtains a dump from the
//! designated long-lived stack module, which runs on its own execution
//! context. The cross-context call executes on the module's own task while
//! the caller waits on a fresh one-shot completion signal with a bounded
//! timeout.
//!
//! # Modules
//!
//! - [`registry`] - Process-wide map of per-subsystem dump callbacks
//! - [`sink`] - Output sink shared between the two dumping contexts
//! - [`dispatch`] - Dump-cycle orchestration and the module's execution context
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface for the dump trigger binary

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod registry;
pub mod sink;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{
    DispatchConfig, Dispatcher, DumpOutcome, ModuleHandle, ModuleHost, ModuleRequest, StackModule,
    SubmitError,
};
pub use registry::{DumpFn, DumpRegistry, DumpToken};
pub use sink::{DumpBuffer, DumpSink};
