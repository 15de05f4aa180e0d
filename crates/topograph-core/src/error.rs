use thiserror::Error;

/// Top-level error type for the Topograph platform.
#[derive(Error, Debug)]
pub enum TopographError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
