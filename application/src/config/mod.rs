//! Application-level configuration.
//!
//! - [`StreamParams`]: read loop control (inactivity timeout, frame
//!   recovery, concurrent submission policy)

pub mod stream_params;

pub use stream_params::{SessionPolicy, StreamParams};
