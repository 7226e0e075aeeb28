//! Stream configuration from TOML (`[stream]` section)

use super::ConfigValidationError;
use campaign_chat_application::{SessionPolicy, StreamParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw stream configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamConfig {
    /// Longest wait for response headers or the next chunk
    pub inactivity_timeout_secs: u64,
    /// Line joins tried for one broken data frame
    pub max_recovery_attempts: u32,
    /// "reject" or "cancel_and_replace"
    pub session_policy: String,
}

impl Default for FileStreamConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: 60,
            max_recovery_attempts: 3,
            session_policy: "reject".to_string(),
        }
    }
}

impl FileStreamConfig {
    pub fn parse_session_policy(&self) -> Result<SessionPolicy, ConfigValidationError> {
        self.session_policy
            .parse()
            .map_err(|_| ConfigValidationError::UnknownSessionPolicy(self.session_policy.clone()))
    }

    /// Convert into the application's read loop parameters.
    pub fn to_stream_params(&self) -> Result<StreamParams, ConfigValidationError> {
        if self.inactivity_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "stream.inactivity_timeout_secs",
            ));
        }
        Ok(StreamParams::default()
            .with_inactivity_timeout(Duration::from_secs(self.inactivity_timeout_secs))
            .with_max_recovery_attempts(self.max_recovery_attempts)
            .with_session_policy(self.parse_session_policy()?))
    }
}
