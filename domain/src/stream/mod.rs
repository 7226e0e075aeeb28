//! Response stream decoding.
//!
//! Stages, in pipeline order:
//!
//! - [`decoder::Utf8ChunkDecoder`]: bytes to text across chunk boundaries
//! - [`frame::FrameBuffer`] / [`frame::classify_line`]: text to classified lines
//! - [`payload::parse_payload`] / [`payload::extract_delta`]: data frames to text fragments
//! - [`pipeline::FrameDecoder`]: all of the above plus split-frame recovery

pub mod decoder;
pub mod error;
pub mod event;
pub mod frame;
pub mod payload;
pub mod pipeline;
