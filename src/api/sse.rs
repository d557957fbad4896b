//! SSE-style line framing
//!
//! The server streams newline-delimited `data: `-prefixed lines over the
//! response body. This module splits the raw byte chunks into lines and
//! strips the framing; what the payload means is up to `stream`.

use reqwest::Response;

/// End-of-stream sentinel sent as the last data line of a completion
pub const DONE_SENTINEL: &str = "[DONE]";

/// Streaming line reader over an open response body.
pub struct SseLines {
    response: Response,
    buf: Vec<u8>,
    body_done: bool,
}

impl SseLines {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            buf: Vec::new(),
            body_done: false,
        }
    }

    /// Next line without its terminator, `None` once the body is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<String>, reqwest::Error> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            if self.body_done {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                // Body ended without a trailing newline
                let line = String::from_utf8_lossy(&self.buf).into_owned();
                self.buf.clear();
                return Ok(Some(line));
            }

            match self.response.chunk().await? {
                Some(chunk) => self.buf.extend_from_slice(&chunk),
                None => self.body_done = true,
            }
        }
    }
}

/// Strip the `data: ` framing from a line.
///
/// Returns `None` for blank lines and lines without the prefix; both carry
/// no payload.
pub fn data_payload(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.strip_prefix("data:").map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_payload_strips_prefix() {
        assert_eq!(data_payload("data: {\"x\":1}"), Some("{\"x\":1}"));
        assert_eq!(data_payload("data: [DONE]"), Some(DONE_SENTINEL));
        assert_eq!(data_payload("data:[DONE]"), Some(DONE_SENTINEL));
    }

    #[test]
    fn test_data_payload_skips_blank_and_unframed() {
        assert_eq!(data_payload(""), None);
        assert_eq!(data_payload("   "), None);
        assert_eq!(data_payload("event: ping"), None);
    }
}
