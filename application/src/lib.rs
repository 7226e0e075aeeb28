//! Application layer for campaign-chat
//!
//! This crate contains the stream chat use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{SessionPolicy, StreamParams};
pub use ports::{
    chat_transport::{ByteStream, ChatRequest, ChatResponse, ChatTransport, TransportError},
    conversation_observer::{ConversationObserver, NoObserver},
};
pub use use_cases::stream_chat::{SessionCanceller, StreamChatUseCase, SubmitError};
