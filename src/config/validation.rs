use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("fetch.concurrency must be positive")]
    ZeroConcurrency,

    #[error("fetch.{field} must be positive")]
    ZeroTimeout { field: &'static str },

    #[error("fetch.user_agent must not be empty")]
    EmptyUserAgent,
}

/// Validate the entire configuration.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.fetch.concurrency == 0 {
        return Err(ValidationError::ZeroConcurrency);
    }

    if config.fetch.request_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "request_timeout_secs",
        });
    }

    if config.fetch.connect_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "connect_timeout_secs",
        });
    }

    if config.fetch.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    Ok(())
}
