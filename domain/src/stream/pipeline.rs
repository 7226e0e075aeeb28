//! The synchronous decode pipeline: bytes in, [`StreamEvent`]s out.
//!
//! [`FrameDecoder`] chains the [`Utf8ChunkDecoder`], [`FrameBuffer`],
//! [`classify_line`], [`parse_payload`] and [`extract_delta`] stages, and
//! owns the two pieces of cross-chunk state that do not belong to any single
//! stage:
//!
//! - **Held frame**: a data line that failed to parse. Servers sometimes put
//!   a raw line break inside a JSON payload, which the line splitter takes for
//!   a frame boundary. The broken line is held, the rest of the current batch
//!   is put back into the buffer, and the next line is joined to it (with the
//!   line break restored) and parsed again. Each join with a non-blank line
//!   is one recovery attempt; running out of attempts is a [`FrameError`].
//! - **Terminal latch**: once `[DONE]` is seen, every later byte is ignored.
//!
//! The recovery only works when the continuation is the very next line. The
//! wire format does not promise that, but it matches what the backend does.

use super::decoder::Utf8ChunkDecoder;
use super::error::FrameError;
use super::event::StreamEvent;
use super::frame::{Frame, FrameBuffer, classify_line};
use super::payload::{PayloadOutcome, extract_delta, finish_reason, parse_payload};
use tracing::{debug, trace, warn};

/// Default number of line joins tried for one broken data frame.
pub const DEFAULT_MAX_RECOVERY_ATTEMPTS: u32 = 3;

/// How a batch of lines ended.
#[derive(Debug, PartialEq, Eq)]
enum Batch {
    /// Every line was consumed.
    Exhausted,
    /// A frame failed to parse; the remaining lines were re-queued.
    Stalled,
    /// The terminal sentinel was reached.
    Terminated,
}

/// Incremental decoder for one response stream.
#[derive(Debug)]
pub struct FrameDecoder {
    text: Utf8ChunkDecoder,
    buffer: FrameBuffer,
    held: Option<String>,
    recovery_attempts: u32,
    max_recovery_attempts: u32,
    terminated: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            text: Utf8ChunkDecoder::new(),
            buffer: FrameBuffer::new(),
            held: None,
            recovery_attempts: 0,
            max_recovery_attempts: DEFAULT_MAX_RECOVERY_ATTEMPTS,
            terminated: false,
        }
    }

    pub fn with_max_recovery_attempts(mut self, max: u32) -> Self {
        self.max_recovery_attempts = max;
        self
    }

    /// True once the terminal sentinel was seen or an error was returned.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// True while a broken data frame waits for its continuation.
    pub fn is_recovering(&self) -> bool {
        self.held.is_some()
    }

    /// Decode one network chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>, FrameError> {
        let mut events = Vec::new();
        if self.terminated {
            trace!("Ignoring {} bytes after stream end", chunk.len());
            return Ok(events);
        }

        let text = self.text.decode(chunk);
        let lines = self.buffer.feed(&text);
        self.drain(lines, &mut events)?;
        Ok(events)
    }

    /// Process `lines`, then keep re-reading whatever a stalled batch put
    /// back. Every stalled pass consumes at least one line.
    fn drain(
        &mut self,
        mut lines: Vec<String>,
        events: &mut Vec<StreamEvent>,
    ) -> Result<(), FrameError> {
        while !lines.is_empty() {
            match self.process_lines(std::mem::take(&mut lines), events)? {
                Batch::Stalled => lines = self.buffer.feed(""),
                Batch::Exhausted | Batch::Terminated => break,
            }
        }
        Ok(())
    }

    /// Drain everything still buffered at end of data.
    ///
    /// An unterminated final line is processed like any other. A held frame
    /// that never became parseable is dropped.
    pub fn finish(&mut self) -> Result<Vec<StreamEvent>, FrameError> {
        let mut events = Vec::new();
        if self.terminated {
            return Ok(events);
        }

        let tail = self.text.finish();
        let lines = self.buffer.feed(&tail);
        self.drain(lines, &mut events)?;
        if !self.terminated
            && let Some(rest) = self.buffer.flush()
        {
            self.drain(vec![rest], &mut events)?;
        }

        if let Some(held) = self.held.take() {
            warn!(
                "Dropping unparseable data frame at end of stream ({} bytes)",
                held.len()
            );
        }
        self.terminated = true;
        Ok(events)
    }

    fn process_lines(
        &mut self,
        lines: Vec<String>,
        events: &mut Vec<StreamEvent>,
    ) -> Result<Batch, FrameError> {
        let mut lines = lines.into_iter();

        while let Some(line) = lines.next() {
            let candidate = match self.held.take() {
                Some(held) if line.trim().is_empty() => {
                    self.held = Some(format!("{held}\n{line}"));
                    continue;
                }
                Some(held) => {
                    self.recovery_attempts += 1;
                    format!("{held}\n{line}")
                }
                None => line,
            };

            let frame = classify_line(&candidate);
            if frame.is_ignorable() {
                trace!("Skipping frame: {:?}", frame);
                continue;
            }
            let Frame::Data(payload) = frame else {
                continue;
            };

            match parse_payload(&payload) {
                PayloadOutcome::Terminal => {
                    debug!("Stream: terminal sentinel");
                    self.terminated = true;
                    events.push(StreamEvent::Terminal);
                    return Ok(Batch::Terminated);
                }
                PayloadOutcome::Parsed(value) => {
                    if self.recovery_attempts > 0 {
                        debug!(
                            "Stream: recovered split frame after {} join(s)",
                            self.recovery_attempts
                        );
                        self.recovery_attempts = 0;
                    }
                    if let Some(reason) = finish_reason(&value) {
                        debug!("Stream: finish_reason={}", reason);
                    }
                    if let Some(delta) = extract_delta(&value) {
                        events.push(StreamEvent::Delta(delta.to_string()));
                    }
                }
                PayloadOutcome::ServerError(message) => {
                    warn!("Stream: server error frame: {}", message);
                    self.terminated = true;
                    return Err(FrameError::ServerReported(message));
                }
                PayloadOutcome::Malformed(reason) => {
                    if self.recovery_attempts >= self.max_recovery_attempts {
                        warn!(
                            "Stream: giving up on malformed frame after {} attempts: {}",
                            self.recovery_attempts, reason
                        );
                        self.terminated = true;
                        return Err(FrameError::Malformed {
                            attempts: self.recovery_attempts,
                            reason,
                        });
                    }

                    debug!(
                        "Stream: holding unparseable frame ({} bytes, attempt {}): {}",
                        candidate.len(),
                        self.recovery_attempts,
                        reason
                    );
                    self.held = Some(candidate);

                    let rest: String = lines.map(|l| l + "\n").collect();
                    if !rest.is_empty() {
                        self.buffer.requeue(&rest);
                    }
                    return Ok(Batch::Stalled);
                }
            }
        }

        Ok(Batch::Exhausted)
    }
}
