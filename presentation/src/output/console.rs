//! Console output formatting for chat sessions

use campaign_chat_domain::{Conversation, Role, SessionOutcome, StreamError};
use colored::Colorize;

/// Formats conversations and session outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// User-facing line for how a session ended.
    ///
    /// `None` for a completed reply: the streamed text already says it all.
    /// Cancellation is reported plainly, not as an error.
    pub fn outcome_line(outcome: &SessionOutcome) -> Option<String> {
        if outcome.is_cancelled() {
            return Some(format!("{}", "Reply cancelled.".dimmed()));
        }
        outcome.error().map(|err| {
            format!("{} {}", "Error:".red().bold(), Self::error_message(err))
        })
    }

    fn error_message(err: &StreamError) -> String {
        match err {
            StreamError::RateLimited => {
                "Too many requests right now. Wait a moment and try again.".to_string()
            }
            StreamError::PaymentRequired => {
                "You are out of credits. Top up your account to keep chatting.".to_string()
            }
            StreamError::Transport(detail) => {
                format!("The assistant could not be reached ({}).", detail)
            }
            StreamError::Timeout(after) => format!(
                "The reply stalled for {}s and was abandoned. Try again.",
                after.as_secs()
            ),
        }
    }

    /// Label printed in front of a message.
    pub fn role_label(role: Role) -> String {
        match role {
            Role::User => format!("{}", "You:".cyan().bold()),
            Role::Assistant => format!("{}", "Assistant:".green().bold()),
            Role::System => format!("{}", "System:".dimmed()),
        }
    }

    /// Format the whole conversation (for `/history`)
    pub fn history(conversation: &Conversation) -> String {
        if conversation.is_empty() {
            return format!("{}\n", "(no messages yet)".dimmed());
        }

        let mut output = String::new();
        for message in conversation.messages() {
            output.push_str(&format!(
                "{} {}\n",
                Self::role_label(message.role),
                message.content
            ));
        }
        output
    }

    /// Boxed title used by the chat banner
    pub fn header(title: &str) -> String {
        let width = title.chars().count() + 8;
        let line = "─".repeat(width);
        format!(
            "╭{}╮\n│    {}    │\n╰{}╯",
            line,
            title.bold(),
            line
        )
    }
}
