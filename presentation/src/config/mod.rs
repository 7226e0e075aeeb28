//! Presentation-level configuration
//!
//! Configuration for REPL behavior, filled in by the binary from the
//! `[repl]` file section and CLI flags.

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Print the welcome banner on start
    pub show_banner: bool,
    /// Show a spinner while waiting for a reply
    pub show_progress: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_banner: true,
            show_progress: true,
        }
    }
}
