//! Configuration file loading for campaign-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `CAMPAIGN_CHAT_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./campaign-chat.toml` or `./.campaign-chat.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/campaign-chat/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEndpointConfig, FileReplConfig, FileStreamConfig,
};
pub use loader::ConfigLoader;
