//! Progress reporting for stream sessions
//!
//! [`StreamReporter`] is the console side of the UI boundary: a spinner while
//! the request is pending, then the reply printed as it grows.

use crate::output::console::ConsoleFormatter;
use campaign_chat_application::ConversationObserver;
use campaign_chat_domain::{Conversation, Role, SessionOutcome, SessionState};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Renders a streaming reply to the terminal
pub struct StreamReporter {
    show_progress: bool,
    spinner: Mutex<Option<ProgressBar>>,
    /// Bytes of the in-flight reply already written to stdout
    printed: Mutex<usize>,
}

impl StreamReporter {
    pub fn new() -> Self {
        Self {
            show_progress: true,
            spinner: Mutex::new(None),
            printed: Mutex::new(0),
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self) {
        if !self.show_progress {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message("Waiting for the assistant...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Part of `content` not yet printed; advances the printed mark.
    fn take_unprinted(&self, content: &str) -> Option<String> {
        let mut printed = self.printed.lock().ok()?;
        let suffix = content.get(*printed..)?;
        if suffix.is_empty() {
            return None;
        }
        *printed = content.len();
        Some(suffix.to_string())
    }

    fn reset(&self) -> usize {
        self.printed
            .lock()
            .map(|mut printed| std::mem::take(&mut *printed))
            .unwrap_or(0)
    }
}

impl Default for StreamReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationObserver for StreamReporter {
    fn on_state_change(&self, state: SessionState) {
        match state {
            SessionState::Requesting => {
                self.reset();
                self.start_spinner();
            }
            SessionState::Streaming => {
                self.clear_spinner();
                print!("{} ", ConsoleFormatter::role_label(Role::Assistant));
                let _ = std::io::stdout().flush();
            }
            _ => self.clear_spinner(),
        }
    }

    fn on_update(&self, conversation: &Conversation) {
        let Some(reply) = conversation.in_flight() else {
            return;
        };
        if let Some(text) = self.take_unprinted(&reply.content) {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    }

    fn on_session_end(&self, _conversation: &Conversation, outcome: &SessionOutcome) {
        self.clear_spinner();
        let printed = self.reset();
        if printed > 0 || matches!(outcome, SessionOutcome::Completed { .. }) {
            println!();
        }
        if let Some(line) = ConsoleFormatter::outcome_line(outcome) {
            eprintln!("{}", line);
        }
    }
}
