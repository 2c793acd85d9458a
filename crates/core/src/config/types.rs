use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::dispatcher::DispatcherConfig;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

/// Queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Channel buffer size for the in-memory queue.
    #[serde(default = "default_buffer")]
    pub buffer: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            buffer: default_buffer(),
        }
    }
}

fn default_buffer() -> usize {
    1024
}

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Maximum resident entries before admission fails (0 = unbounded).
    #[serde(default)]
    pub max_pending: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_pending: 0 }
    }
}
