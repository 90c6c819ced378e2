//! Dispatch coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Dispatch coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// How long a dump cycle waits for the stack module's completion signal
    /// before treating the module's context as deadlocked
    #[serde(rename = "module-timeout-ms", default = "default_module_timeout_ms")]
    pub module_timeout_ms: u64,

    /// Request channel depth for the module's execution context
    #[serde(rename = "channel-buffer", default = "default_channel_buffer")]
    pub channel_buffer: usize,
}

fn default_module_timeout_ms() -> u64 {
    debug!("default_module_timeout_ms: called");
    1000
}

fn default_channel_buffer() -> usize {
    debug!("default_channel_buffer: called");
    8
}

impl Default for DispatchConfig {
    fn default() -> Self {
        debug!("DispatchConfig::default: called");
        Self {
            module_timeout_ms: 1000,
            channel_buffer: 8,
        }
    }
}

impl DispatchConfig {
    /// Get the completion-wait bound as a Duration
    pub fn module_timeout(&self) -> Duration {
        debug!(module_timeout_ms = %self.module_timeout_ms, "DispatchConfig::module_timeout: called");
        Duration::from_millis(self.module_timeout_ms)
    }
}
