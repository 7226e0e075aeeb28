//! Stream parameters for the read loop.
//!
//! [`StreamParams`] groups the static parameters that control the read loop
//! in [`StreamChatUseCase`](crate::use_cases::stream_chat::StreamChatUseCase).
//! These are application-layer concerns, not domain policy.

use campaign_chat_domain::DEFAULT_MAX_RECOVERY_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// What to do when a submission arrives while a session is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Refuse the new submission (input stays disabled while streaming).
    #[default]
    Reject,
    /// Cancel the running session, roll it back, and start the new one.
    CancelAndReplace,
}

impl FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "reject" => Ok(SessionPolicy::Reject),
            "cancel_and_replace" | "replace" => Ok(SessionPolicy::CancelAndReplace),
            other => Err(format!(
                "unknown session policy '{}' (expected 'reject' or 'cancel_and_replace')",
                other
            )),
        }
    }
}

/// Read loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamParams {
    /// Longest wait for response headers or for the next chunk.
    pub inactivity_timeout: Duration,
    /// Line joins tried for one broken data frame before giving up.
    pub max_recovery_attempts: u32,
    /// Concurrent submission handling.
    pub session_policy: SessionPolicy,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(60),
            max_recovery_attempts: DEFAULT_MAX_RECOVERY_ATTEMPTS,
            session_policy: SessionPolicy::Reject,
        }
    }
}

impl StreamParams {
    // ==================== Builder Methods ====================

    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    pub fn with_max_recovery_attempts(mut self, max: u32) -> Self {
        self.max_recovery_attempts = max;
        self
    }

    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = StreamParams::default();
        assert_eq!(params.inactivity_timeout, Duration::from_secs(60));
        assert_eq!(params.max_recovery_attempts, 3);
        assert_eq!(params.session_policy, SessionPolicy::Reject);
    }

    #[test]
    fn test_builder() {
        let params = StreamParams::default()
            .with_inactivity_timeout(Duration::from_millis(250))
            .with_max_recovery_attempts(1)
            .with_session_policy(SessionPolicy::CancelAndReplace);

        assert_eq!(params.inactivity_timeout, Duration::from_millis(250));
        assert_eq!(params.max_recovery_attempts, 1);
        assert_eq!(params.session_policy, SessionPolicy::CancelAndReplace);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reject".parse::<SessionPolicy>(), Ok(SessionPolicy::Reject));
        assert_eq!(
            "Cancel-And-Replace".parse::<SessionPolicy>(),
            Ok(SessionPolicy::CancelAndReplace)
        );
        assert!("queue".parse::<SessionPolicy>().is_err());
    }
}
