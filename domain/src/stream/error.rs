//! Decode pipeline errors

use thiserror::Error;

/// Unrecoverable problems found while decoding the frame stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Malformed data frame after {attempts} recovery attempts: {reason}")]
    Malformed { attempts: u32, reason: String },

    #[error("Server reported an error: {0}")]
    ServerReported(String),
}
