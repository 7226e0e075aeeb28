//! Conversation domain.
//!
//! - [`entities::Conversation`]: ordered message history of one chat
//! - [`entities::Message`]: a single message within a conversation
//! - [`assembler::MessageAssembler`]: grows, finalizes or rolls back the in-flight reply

pub mod assembler;
pub mod entities;
