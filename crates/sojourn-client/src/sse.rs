//! Incremental framing for the SSE-style plan stream.
//!
//! The server frames each event as `data: <JSON>\n\n`. One network read does
//! not equal one logical record: a record may span two reads, and one read
//! may carry several records. [`SseFramer`] buffers raw bytes across pushes
//! and only yields a payload once a full blank-line boundary has been seen,
//! so split records reassemble instead of corrupting.

/// Byte-buffering record scanner for `data:`-prefixed SSE records.
#[derive(Debug, Default)]
pub struct SseFramer {
    buf: Vec<u8>,
}

impl SseFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of response bytes, returning every payload completed
    /// by it. The incomplete tail (if any) is retained for the next push.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some((boundary, sep_len)) = find_boundary(&self.buf) {
            let record: Vec<u8> = self.buf.drain(..boundary + sep_len).collect();
            if let Some(payload) = extract_payload(&record[..boundary]) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Drain a trailing record that was never terminated by a blank line.
    ///
    /// Called when the underlying stream signals completion, so a final
    /// record without the closing separator is not lost.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buf);
        extract_payload(&rest)
    }

    /// Number of buffered bytes awaiting a record boundary.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }
}

/// Find the first record separator, `\n\n` or its CRLF form `\r\n\r\n`.
///
/// Returns the separator's offset and length. The planner server emits bare
/// `\n\n`, but a proxy normalizing to strict CRLF framing must not make the
/// framer buffer the whole stream until close.
fn find_boundary(buf: &[u8]) -> Option<(usize, usize)> {
    for i in 0..buf.len() {
        if buf[i..].starts_with(b"\r\n\r\n") {
            return Some((i, 4));
        }
        if buf[i..].starts_with(b"\n\n") {
            return Some((i, 2));
        }
    }
    None
}

/// Extract the JSON payload from one record's bytes.
///
/// Lines not starting with the `data:` marker are ignored; multiple data
/// lines in one record are joined with a newline per the SSE convention.
fn extract_payload(record: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(record);
    let mut parts = Vec::new();
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(rest) = line.strip_prefix("data:") {
            parts.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
