//! Configuration errors.

use std::num::ParseIntError;
use thiserror::Error;

/// Errors raised while reading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A seed variable did not hold a decimal `u64`.
    #[error("invalid seed in {var}: {value:?}")]
    InvalidSeed {
        /// The environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// The underlying parse error.
        #[source]
        source: ParseIntError,
    },

    /// A flag variable held something other than a boolean.
    #[error("invalid flag in {var}: {value:?} (expected 0, 1, true or false)")]
    InvalidFlag {
        /// The environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A global tracing subscriber was already installed.
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
