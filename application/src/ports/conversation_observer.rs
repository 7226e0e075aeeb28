//! UI boundary port
//!
//! Defines how the stream controller publishes the conversation while a
//! reply streams in.

use campaign_chat_domain::{Conversation, SessionOutcome, SessionState};

/// Callback for conversation updates during a stream session
///
/// Implementations live in the presentation layer and only render what they
/// are given; they never mutate the conversation.
pub trait ConversationObserver: Send + Sync {
    /// Called on every state machine transition.
    fn on_state_change(&self, _state: SessionState) {}

    /// Called when the in-flight reply is opened and after every delta.
    fn on_update(&self, conversation: &Conversation);

    /// Called once per session, after finalization or rollback.
    fn on_session_end(&self, conversation: &Conversation, outcome: &SessionOutcome);
}

/// No-op observer for when nothing renders the conversation
pub struct NoObserver;

impl ConversationObserver for NoObserver {
    fn on_update(&self, _conversation: &Conversation) {}
    fn on_session_end(&self, _conversation: &Conversation, _outcome: &SessionOutcome) {}
}
