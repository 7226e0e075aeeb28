//! Stream session domain.
//!
//! - [`state::SessionState`]: lifecycle states of one stream session
//! - [`outcome::SessionOutcome`]: how a session ended
//! - [`outcome::StreamError`]: user-facing failure taxonomy

pub mod outcome;
pub mod state;
