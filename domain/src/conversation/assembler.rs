//! Assembles streamed deltas into the in-flight assistant message.

use super::entities::Conversation;

/// Owns a [`Conversation`] for the duration of one stream session.
///
/// Lifecycle:
///
/// 1. [`on_start`](Self::on_start) pushes an empty assistant message.
/// 2. [`on_delta`](Self::on_delta) appends text; content only grows.
/// 3. Exactly one of [`on_complete`](Self::on_complete) (keep the message) or
///    [`on_error`](Self::on_error) (remove it).
///
/// Dropping the assembler without completing rolls back like `on_error`, so
/// an abandoned session never leaves a half-written reply behind.
pub struct MessageAssembler<'a> {
    conversation: &'a mut Conversation,
    baseline: usize,
    finished: bool,
}

impl<'a> MessageAssembler<'a> {
    /// Open a new in-flight assistant message.
    pub fn on_start(conversation: &'a mut Conversation) -> Self {
        let baseline = conversation.len();
        conversation.open_in_flight();
        Self {
            conversation,
            baseline,
            finished: false,
        }
    }

    /// Append a fragment and return the full content so far.
    pub fn on_delta(&mut self, text: &str) -> &str {
        match self.conversation.in_flight_mut() {
            Some(message) => {
                message.content.push_str(text);
                &message.content
            }
            None => "",
        }
    }

    /// Current content of the in-flight message.
    pub fn content(&self) -> &str {
        self.conversation
            .in_flight()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    /// The conversation as it should be presented right now.
    pub fn conversation(&self) -> &Conversation {
        self.conversation
    }

    /// Keep the message and return its final content.
    pub fn on_complete(mut self) -> String {
        self.finished = true;
        let content = self.content().to_string();
        self.conversation.close_in_flight();
        content
    }

    /// Remove everything this session added.
    pub fn on_error(mut self) {
        self.rollback();
    }

    fn rollback(&mut self) {
        self.finished = true;
        self.conversation.truncate(self.baseline);
    }
}

impl Drop for MessageAssembler<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.rollback();
        }
    }
}
