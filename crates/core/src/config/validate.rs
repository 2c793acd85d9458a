use super::types::{Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Worker count is at least 1
/// - Backoff interval is nonzero
/// - Queue buffer is nonzero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.dispatcher.worker_count == 0 {
        return Err(ConfigError::ValidationError(
            "dispatcher.worker_count must be at least 1".to_string(),
        ));
    }

    if config.dispatcher.backoff_ms == 0 {
        return Err(ConfigError::ValidationError(
            "dispatcher.backoff_ms cannot be 0".to_string(),
        ));
    }

    if config.queue.buffer == 0 {
        return Err(ConfigError::ValidationError(
            "queue.buffer cannot be 0".to_string(),
        ));
    }

    Ok(())
}
