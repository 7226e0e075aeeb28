//! Events produced by the frame decoder.

/// An event decoded from the response stream.
///
/// The decoder emits zero or more events per network chunk, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental text fragment.
    Delta(String),
    /// The terminal sentinel was seen. Nothing follows.
    Terminal,
}

impl StreamEvent {
    /// Returns the text content if this is a Delta event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            StreamEvent::Terminal => None,
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Terminal)
    }
}
