//! Stream session state machine.
//!
//! ```text
//! Idle ──▶ Requesting ──▶ Streaming ──▶ Completed
//!              │  │            │ │
//!              │  └──▶ Failed ◀┘ │
//!              └────▶ Cancelled ◀┘
//! ```
//!
//! Terminal states go back to `Idle` once the caller has acknowledged the
//! outcome (for example by re-enabling its input).

use serde::{Deserialize, Serialize};

/// Lifecycle state of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    /// Returns true while a request is open (input should be disabled).
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Requesting | SessionState::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Failed | SessionState::Cancelled
        )
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Requesting)
                | (Requesting, Streaming)
                | (Requesting, Failed)
                | (Requesting, Cancelled)
                | (Streaming, Completed)
                | (Streaming, Failed)
                | (Streaming, Cancelled)
                | (Completed, Idle)
                | (Failed, Idle)
                | (Cancelled, Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Requesting => "requesting",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
            SessionState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
