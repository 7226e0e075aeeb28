//! REPL (Read-Eval-Print Loop) for interactive chat

use super::interrupt::submit_interruptible;
use crate::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::StreamReporter;
use campaign_chat_application::StreamChatUseCase;
use campaign_chat_domain::Conversation;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    History,
    Clear,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        match line {
            "/quit" | "/exit" | "/q" => Command::Quit,
            "/help" | "/h" | "/?" => Command::Help,
            "/history" => Command::History,
            "/clear" => Command::Clear,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat REPL
///
/// Holds the conversation for the lifetime of the chat; each line the user
/// enters becomes one stream session.
pub struct ChatRepl {
    use_case: StreamChatUseCase,
    conversation: Conversation,
    config: ReplConfig,
    endpoint: String,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: StreamChatUseCase, endpoint: impl Into<String>) -> Self {
        Self {
            use_case,
            conversation: Conversation::new(),
            config: ReplConfig::default(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if self.config.show_banner {
            self.print_welcome();
        }

        loop {
            print!("{} ", ">>>".bold());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    println!("^C (type /quit to exit)");
                    continue;
                }
            };

            let Some(line) = line else {
                println!("Bye!");
                break;
            };
            let line = line.trim();

            // Skip empty lines
            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                if self.handle_command(line) {
                    break;
                }
                continue;
            }

            self.process_message(line).await;
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("Campaign Assistant - Chat Mode"));
        println!();
        println!("Endpoint: {}", self.endpoint);
        println!(
            "Reply timeout: {}s without data",
            self.use_case.params().inactivity_timeout.as_secs()
        );
        println!();
        Self::print_commands();
    }

    fn print_commands() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /history          - Show the conversation so far");
        println!("  /clear            - Start a new conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
        println!("Press Ctrl-C while a reply streams to cancel it.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match Command::parse(cmd) {
            Command::Quit => {
                println!("Bye!");
                true
            }
            Command::Help => {
                println!();
                Self::print_commands();
                false
            }
            Command::History => {
                println!();
                print!("{}", ConsoleFormatter::history(&self.conversation));
                println!();
                false
            }
            Command::Clear => {
                self.conversation.clear();
                self.use_case.acknowledge();
                println!("{}", "Conversation cleared.".dimmed());
                false
            }
            Command::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_message(&mut self, text: &str) {
        println!();

        let reporter = StreamReporter::new().with_progress(self.config.show_progress);
        let result =
            submit_interruptible(&self.use_case, &mut self.conversation, text, &reporter).await;

        match result {
            Ok(outcome) => debug!("Session ended: {}", outcome.state()),
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
        self.use_case.acknowledge();
        println!();
    }
}
