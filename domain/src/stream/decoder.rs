//! Incremental UTF-8 decoding of network chunks.
//!
//! Chunk boundaries are arbitrary, so a multi-byte character may be split
//! across two reads. [`Utf8ChunkDecoder`] holds the incomplete tail of one
//! chunk and completes it with the head of the next.

/// Longest possible incomplete UTF-8 sequence (a 4-byte char missing its last byte).
const MAX_PENDING: usize = 3;

/// Stateful byte-to-text decoder.
///
/// Invalid sequences decode to U+FFFD instead of failing. A dangling
/// incomplete sequence at the end of the stream is substituted only by
/// [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end of input: wait for more bytes.
                            debug_assert!(tail.len() <= MAX_PENDING);
                            self.pending.extend_from_slice(tail);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush any held bytes at end of stream.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let tail = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&tail).into_owned()
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
