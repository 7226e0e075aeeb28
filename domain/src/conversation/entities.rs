//! Conversation domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered message history of one chat (Entity)
///
/// Append-only from the outside. The single in-flight assistant message of
/// an active stream session can only be opened, grown, finalized or removed
/// through [`MessageAssembler`](super::assembler::MessageAssembler).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    in_flight: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            in_flight: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The assistant message currently being streamed, if any.
    pub fn in_flight(&self) -> Option<&Message> {
        self.in_flight.and_then(|i| self.messages.get(i))
    }

    pub fn is_streaming(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append a finished assistant message (e.g. restored from a previous session).
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.in_flight = None;
    }

    pub(crate) fn open_in_flight(&mut self) {
        self.messages.push(Message::assistant(String::new()));
        self.in_flight = Some(self.messages.len() - 1);
    }

    pub(crate) fn in_flight_mut(&mut self) -> Option<&mut Message> {
        self.in_flight.and_then(|i| self.messages.get_mut(i))
    }

    pub(crate) fn close_in_flight(&mut self) {
        self.in_flight = None;
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
        self.in_flight = None;
    }
}
