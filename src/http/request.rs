//! Minimal HTTP/1.1 request reader.
//!
//! Reads only far enough to find the blank line that terminates the
//! headers.  Method, path and headers are never interpreted; every request
//! gets the same response.
//!
//! ```text
//!   READING_LINE ──'\r'──▶ READING_LINE        (discarded)
//!   READING_LINE ──'\n'──▶ COMPLETE            (line empty: end of headers)
//!   READING_LINE ──'\n'──▶ READING_LINE        (line cleared)
//!   READING_LINE ──byte──▶ READING_LINE        (appended to line)
//! ```

/// Bytes of a single line kept in memory.  Longer lines are truncated;
/// only whether the line is empty matters for parsing.
pub const LINE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    ReadingLine,
    Complete,
}

pub struct RequestParser {
    state: ParseState,
    line: heapless::Vec<u8, LINE_CAPACITY>,
    /// First non-empty line (e.g. `GET / HTTP/1.1`), kept for logging.
    request_line: heapless::Vec<u8, LINE_CAPACITY>,
    lines: u32,
    bytes: usize,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::ReadingLine,
            line: heapless::Vec::new(),
            request_line: heapless::Vec::new(),
            lines: 0,
            bytes: 0,
        }
    }

    /// Consume one byte.  Bytes arriving after completion are ignored.
    pub fn feed(&mut self, byte: u8) -> ParseState {
        if self.state == ParseState::Complete {
            return self.state;
        }
        self.bytes += 1;

        match byte {
            b'\r' => {}
            b'\n' => {
                if self.line.is_empty() {
                    self.state = ParseState::Complete;
                } else {
                    if self.lines == 0 {
                        self.request_line = self.line.clone();
                    }
                    self.lines += 1;
                    self.line.clear();
                }
            }
            other => {
                // A full buffer is still non-empty, which is all we need.
                let _ = self.line.push(other);
            }
        }
        self.state
    }

    /// Feed a slice; stops at completion.  Returns the bytes consumed.
    pub fn feed_slice(&mut self, data: &[u8]) -> usize {
        for (i, &b) in data.iter().enumerate() {
            if self.feed(b) == ParseState::Complete {
                return i + 1;
            }
        }
        data.len()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ParseState::Complete
    }

    /// Number of non-empty lines terminated so far.
    pub fn lines_seen(&self) -> u32 {
        self.lines
    }

    /// Total bytes consumed before completion.
    pub fn bytes_seen(&self) -> usize {
        self.bytes
    }

    /// The (possibly truncated) request line, lossily decoded.
    pub fn request_line(&self) -> &str {
        core::str::from_utf8(&self.request_line).unwrap_or("<non-utf8>")
    }

    /// The line currently being accumulated.
    pub fn current_line(&self) -> &[u8] {
        &self.line
    }
}
