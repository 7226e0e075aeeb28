//! Presentation layer for campaign-chat
//!
//! This crate contains CLI definitions, console output formatting, the
//! streaming reply reporter, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, submit_interruptible};
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::StreamReporter;
