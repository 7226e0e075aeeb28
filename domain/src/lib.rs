//! Domain layer for campaign-chat
//!
//! This crate contains the conversation entities and the synchronous decode
//! pipeline for streamed chat replies. It has no dependencies on async
//! runtimes, networking, or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! An ordered list of [`Message`]s. While a reply streams in, exactly one
//! assistant message is in flight and only the [`MessageAssembler`] touches it.
//!
//! ## Frame decoding
//!
//! The backend answers with one frame per line (`data: <json>`), ending with
//! `data: [DONE]`. [`FrameDecoder`] turns arbitrary byte chunks into ordered
//! [`StreamEvent`]s.

pub mod conversation;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use conversation::{
    assembler::MessageAssembler,
    entities::{Conversation, Message, Role},
};
pub use session::{
    outcome::{SessionOutcome, StreamError},
    state::SessionState,
};
pub use stream::{
    decoder::Utf8ChunkDecoder,
    error::FrameError,
    event::StreamEvent,
    frame::{Frame, FrameBuffer, classify_line},
    payload::{PayloadOutcome, TERMINAL_SENTINEL, extract_delta, parse_payload},
    pipeline::{DEFAULT_MAX_RECOVERY_ATTEMPTS, FrameDecoder},
};
