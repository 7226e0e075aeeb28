//! Session outcomes and the failure taxonomy

use super::state::SessionState;
use crate::stream::error::FrameError;
use std::time::Duration;
use thiserror::Error;

/// Why a stream session failed.
///
/// The subsystem only classifies; callers decide how to word each case.
/// None of these are retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// HTTP 429.
    #[error("Rate limited, please wait before sending another message")]
    RateLimited,

    /// HTTP 402.
    #[error("Payment required, add credits to continue")]
    PaymentRequired,

    /// Any other non-success status, a missing body, a broken connection,
    /// or a stream that could not be decoded.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No data arrived within the inactivity window.
    #[error("No data received for {0:?}")]
    Timeout(Duration),
}

impl StreamError {
    /// Classify a response status. `None` means the status allows streaming.
    ///
    /// A success status without a body is still a transport error.
    pub fn from_status(status: u16, has_body: bool) -> Option<Self> {
        match status {
            200..=299 if has_body => None,
            200..=299 => Some(StreamError::Transport(format!(
                "status {status} without a response body"
            ))),
            429 => Some(StreamError::RateLimited),
            402 => Some(StreamError::PaymentRequired),
            other => Some(StreamError::Transport(format!("unexpected status {other}"))),
        }
    }

    /// Generic failures the caller may treat alike (everything but 429/402).
    pub fn is_transport(&self) -> bool {
        matches!(self, StreamError::Transport(_) | StreamError::Timeout(_))
    }
}

impl From<FrameError> for StreamError {
    fn from(err: FrameError) -> Self {
        StreamError::Transport(err.to_string())
    }
}

/// How a stream session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The reply was kept in the conversation.
    Completed { content: String },
    /// The reply was rolled back.
    Failed(StreamError),
    /// The caller cancelled; the reply was rolled back. Not an error.
    Cancelled,
}

impl SessionOutcome {
    /// The terminal [`SessionState`] matching this outcome.
    pub fn state(&self) -> SessionState {
        match self {
            SessionOutcome::Completed { .. } => SessionState::Completed,
            SessionOutcome::Failed(_) => SessionState::Failed,
            SessionOutcome::Cancelled => SessionState::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionOutcome::Cancelled)
    }

    pub fn error(&self) -> Option<&StreamError> {
        match self {
            SessionOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}
