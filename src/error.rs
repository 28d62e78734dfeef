//! Error types for configuration loading.
//!
//! Only the load path can fail. Reads never return errors: a missing path or
//! a value of the wrong shape degrades to the accessor's default instead.

use thiserror::Error;

/// Errors raised while feeding data into a [`ConfigStore`](crate::config::ConfigStore).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A payload could not be parsed as YAML or JSON.
    #[error("malformed config from {origin}: {message}")]
    MalformedInput { origin: String, message: String },

    /// A loader could not retrieve its bytes.
    #[error("config source {origin} unavailable: {source}")]
    SourceUnavailable {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The URI names a scheme no loader handles.
    #[error("unsupported config source: {0}")]
    UnsupportedSource(String),

    /// A document parsed, but its root is not a mapping.
    #[error("config from {0} must be a mapping at the top level")]
    InvalidDocument(String),

    /// A resolved value could not be decoded into the requested type.
    #[error("failed to decode config value: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn malformed(origin: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::MalformedInput {
            origin: origin.into(),
            message: err.to_string(),
        }
    }

    pub fn unavailable(origin: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            origin: origin.into(),
            source,
        }
    }
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
