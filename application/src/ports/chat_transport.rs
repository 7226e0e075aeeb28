//! Chat transport port
//!
//! Defines the interface for opening a streamed reply from the chat backend.

use async_trait::async_trait;
use campaign_chat_domain::{Conversation, Message};
use futures::stream::BoxStream;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by transport adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Read error: {0}")]
    Read(String),
}

/// Raw response body, chunked as it arrives from the network.
///
/// Dropping the stream releases the underlying connection.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Request body: the full ordered history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

impl ChatRequest {
    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            messages: conversation.messages().to_vec(),
        }
    }
}

/// Status line and (maybe) body of a response.
pub struct ChatResponse {
    pub status: u16,
    pub body: Option<ByteStream>,
}

impl ChatResponse {
    pub fn new(status: u16, body: Option<ByteStream>) -> Self {
        Self { status, body }
    }
}

impl std::fmt::Debug for ChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Transport to the text-generation backend
///
/// Implementations (adapters) live in the infrastructure layer. `open`
/// resolves once the response status is known; the body is read lazily.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}
