//! Line framing for the streamed response body.
//!
//! The wire format is one frame per line:
//!
//! - `: keep-alive`: comment, ignored
//! - empty line: event separator, ignored
//! - `data: <payload>`: data frame
//! - anything else: unrecognized, dropped

/// Marker prefix of a comment line.
pub const COMMENT_MARKER: char = ':';

/// Marker prefix of a data line.
pub const DATA_MARKER: &str = "data:";

/// Classification of one complete line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Empty or whitespace-only line.
    Blank,
    /// Comment line (server heartbeat).
    Comment,
    /// Data line; carries the trimmed payload after the marker.
    Data(String),
    /// Any other line (`event:`, `id:`, noise). Dropped.
    Unrecognized,
}

impl Frame {
    /// Returns true for frames the pipeline skips without looking further.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Frame::Blank | Frame::Comment | Frame::Unrecognized)
    }
}

/// Classify a single line. Never fails.
pub fn classify_line(line: &str) -> Frame {
    if line.trim().is_empty() {
        return Frame::Blank;
    }
    if line.starts_with(COMMENT_MARKER) {
        return Frame::Comment;
    }
    match line.strip_prefix(DATA_MARKER) {
        Some(payload) => Frame::Data(payload.trim().to_string()),
        None => Frame::Unrecognized,
    }
}

/// Accumulates decoded text and hands out complete lines.
///
/// A trailing partial line is never dropped: it stays in the buffer and is
/// completed by the next [`feed`](Self::feed), or returned by
/// [`flush`](Self::flush) at end of stream.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: String,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and drain every complete line.
    ///
    /// Lines are split on `\n`; one trailing `\r` per line is stripped.
    pub fn feed(&mut self, text: &str) -> Vec<String> {
        self.buf.push_str(text);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buf[start..].find('\n') {
            let end = start + offset;
            let line = self.buf[start..end].strip_suffix('\r').unwrap_or(&self.buf[start..end]);
            lines.push(line.to_string());
            start = end + 1;
        }
        self.buf.drain(..start);

        lines
    }

    /// Put `text` back in front of whatever is buffered.
    pub fn requeue(&mut self, text: &str) {
        self.buf.insert_str(0, text);
    }

    /// Take the final unterminated line, if any.
    pub fn flush(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        Some(rest.strip_suffix('\r').map(str::to_string).unwrap_or(rest))
    }

    /// The buffered partial line.
    pub fn pending(&self) -> &str {
        &self.buf
    }
}
