//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for campaign-chat
#[derive(Parser, Debug)]
#[command(name = "campaign-chat")]
#[command(author, version, about = "Streaming chat client for the campaign assistant")]
#[command(long_about = r#"
campaign-chat sends your message to the campaign assistant endpoint and
prints the reply as it streams in. Press Ctrl-C to cancel a reply; a
cancelled or failed reply is discarded from the conversation.

Configuration is loaded from (in priority order):
1. CAMPAIGN_CHAT_<SECTION>__<KEY> environment variables
2. --config <path>             Explicit config file
3. ./campaign-chat.toml        Project-level config
4. ~/.config/campaign-chat/config.toml   Global config

Example:
  campaign-chat "Suggest three headlines for a spring shoe sale"
  campaign-chat --chat --endpoint https://example.com/functions/v1/campaign-chat
"#)]
pub struct Cli {
    /// The message to send (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Chat endpoint URL (overrides config)
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Inactivity timeout in seconds (overrides config)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
