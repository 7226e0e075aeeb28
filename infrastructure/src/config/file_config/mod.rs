//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into application types
//! happens through `to_*` methods that validate as they go.

mod endpoint;
mod repl;
mod stream;

pub use endpoint::FileEndpointConfig;
pub use repl::FileReplConfig;
pub use stream::FileStreamConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("endpoint.url cannot be empty")]
    EmptyEndpoint,

    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("stream.session_policy: unknown value '{0}' (expected 'reject' or 'cancel_and_replace')")]
    UnknownSessionPolicy(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat endpoint settings
    pub endpoint: FileEndpointConfig,
    /// Read loop settings
    pub stream: FileStreamConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.endpoint.url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEndpoint);
        }
        if self.endpoint.connect_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "endpoint.connect_timeout_secs",
            ));
        }
        self.stream.to_stream_params()?;
        Ok(())
    }
}
