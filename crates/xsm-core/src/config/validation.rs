use crate::config::types::XsmConfig;
use crate::errors::ConfigError;

/// Longest pause any interval setting may request.
pub const MAX_INTERVAL_MS: u64 = 60_000;

pub fn validate_config(config: &XsmConfig) -> Result<(), ConfigError> {
    let restore = &config.restore;

    if restore.placement_every == 0 {
        return Err(invalid("restore.placement_every must be at least 1"));
    }
    if restore.retry_passes == 0 {
        return Err(invalid("restore.retry_passes must be at least 1"));
    }

    let intervals = [
        ("restore.restoring_interval_ms", restore.restoring_interval_ms),
        ("restore.retry_interval_ms", restore.retry_interval_ms),
        ("restore.move_settle_ms", restore.move_settle_ms),
        (
            "restore.enumeration_retry_delay_ms",
            restore.enumeration_retry_delay_ms,
        ),
        ("close.interval_ms", config.close.interval_ms),
    ];
    for (name, value) in intervals {
        if value > MAX_INTERVAL_MS {
            return Err(invalid(&format!(
                "{} is {}ms, the maximum is {}ms",
                name, value, MAX_INTERVAL_MS
            )));
        }
    }

    if config
        .matching
        .leading_token_classes
        .iter()
        .any(|c| c.trim().is_empty())
    {
        return Err(invalid("matching.leading_token_classes contains an empty entry"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.to_string(),
    }
}
