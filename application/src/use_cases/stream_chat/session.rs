//! Session slot: at most one active stream session per controller.
//!
//! The slot holds the current [`SessionState`] and the cancellation token of
//! the active session. A [`SessionGuard`] represents ownership of the slot by
//! one session; state writes from a session that has been replaced are
//! ignored, so a cancelled session cannot clobber its successor's state.

use crate::config::SessionPolicy;
use campaign_chat_domain::SessionState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors returned when a submission cannot start a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A reply is still streaming")]
    SessionActive,
}

#[derive(Debug, Default)]
struct SlotState {
    state: SessionState,
    active: Option<(u64, CancellationToken)>,
    next_id: u64,
}

#[derive(Debug, Default)]
pub(crate) struct SessionSlot {
    inner: Mutex<SlotState>,
}

impl SessionSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Return a terminal state to `Idle`.
    pub(crate) fn acknowledge(&self) -> bool {
        let mut slot = self.lock();
        if slot.state.is_terminal() {
            debug!("Session state {} -> idle (acknowledged)", slot.state);
            slot.state = SessionState::Idle;
            true
        } else {
            false
        }
    }

    /// Claim the slot for a new session.
    pub(crate) fn begin(
        self: &Arc<Self>,
        policy: SessionPolicy,
    ) -> Result<SessionGuard, SubmitError> {
        let mut slot = self.lock();

        if let Some((id, token)) = &slot.active {
            match policy {
                SessionPolicy::Reject => {
                    debug!("Rejecting submission: session {} is {}", id, slot.state);
                    return Err(SubmitError::SessionActive);
                }
                SessionPolicy::CancelAndReplace => {
                    info!("Cancelling session {} to start a new one", id);
                    token.cancel();
                }
            }
        }

        if slot.state.is_terminal() {
            slot.state = SessionState::Idle;
        }

        let id = slot.next_id;
        slot.next_id += 1;
        let token = CancellationToken::new();
        slot.active = Some((id, token.clone()));
        slot.state = SessionState::Requesting;

        Ok(SessionGuard {
            slot: Arc::clone(self),
            id,
            token,
        })
    }

    /// Cancel the active session, if any. Returns whether one was running.
    fn cancel_active(&self) -> bool {
        let slot = self.lock();
        match &slot.active {
            Some((id, token)) if !token.is_cancelled() => {
                info!("Cancelling session {}", id);
                token.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Ownership of the session slot for the lifetime of one session.
pub(crate) struct SessionGuard {
    slot: Arc<SessionSlot>,
    id: u64,
    token: CancellationToken,
}

impl SessionGuard {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Move the slot to `next` if this session still owns it.
    pub(crate) fn transition(&self, next: SessionState) {
        let mut slot = self.slot.lock();
        if !matches!(&slot.active, Some((id, _)) if *id == self.id) {
            debug!(
                "Session {}: replaced, not recording {}",
                self.id, next
            );
            return;
        }
        if !slot.state.can_transition_to(next) {
            warn!(
                "Session {}: illegal transition {} -> {}",
                self.id, slot.state, next
            );
            return;
        }
        debug!("Session {}: {} -> {}", self.id, slot.state, next);
        slot.state = next;
        if next.is_terminal() {
            slot.active = None;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if matches!(&slot.active, Some((id, _)) if *id == self.id) {
            // The session future was dropped mid-flight.
            slot.active = None;
            slot.state = SessionState::Cancelled;
        }
    }
}

/// Cloneable handle that cancels whichever session is active.
///
/// Calling [`cancel`](Self::cancel) twice, or after the session ended, is a
/// no-op.
#[derive(Clone)]
pub struct SessionCanceller {
    slot: Arc<SessionSlot>,
}

impl SessionCanceller {
    pub(crate) fn new(slot: Arc<SessionSlot>) -> Self {
        Self { slot }
    }

    pub fn cancel(&self) -> bool {
        self.slot.cancel_active()
    }

    pub fn state(&self) -> SessionState {
        self.slot.state()
    }
}
