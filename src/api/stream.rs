//! Streaming response handling
//!
//! Two consumers of the SSE line streams: the completion decoder, which
//! turns `/v1/completions` lines into incremental text events, and the
//! load-progress tracker, which turns `/v1/model/load` lines into a 0-100
//! percentage and one terminal outcome.

use crate::api::sse::{data_payload, SseLines, DONE_SENTINEL};
use crate::api::ApiError;
use serde::Deserialize;

/// One event of a completion stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Next text fragment, in server order
    Text(String),
    /// The server finished the completion
    Done,
    /// The transport failed mid-stream
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// Decode one completion line.
///
/// Blank lines, unframed lines, and malformed JSON all yield `None`; a
/// garbled line is logged and skipped rather than killing the stream.
pub fn decode_completion_line(line: &str) -> Option<StreamEvent> {
    let payload = data_payload(line)?;
    if payload == DONE_SENTINEL {
        return Some(StreamEvent::Done);
    }
    match serde_json::from_str::<CompletionChunk>(payload) {
        Ok(chunk) => {
            let text = chunk.choices.into_iter().next().map(|c| c.text)?;
            Some(StreamEvent::Text(text))
        }
        Err(e) => {
            tracing::warn!("Skipping malformed completion line: {}", e);
            None
        }
    }
}

/// Pull-based decoder over an open completion stream.
///
/// Emits `Text` fragments in server order and exactly one terminal event:
/// `Done` when the server sends the end sentinel or the body simply ends,
/// `Failed` when the transport errors mid-stream. After the terminal event
/// `next` returns `None`.
pub struct CompletionStream {
    lines: SseLines,
    terminated: bool,
}

impl CompletionStream {
    pub fn new(lines: SseLines) -> Self {
        Self {
            lines,
            terminated: false,
        }
    }

    pub async fn next(&mut self) -> Option<StreamEvent> {
        if self.terminated {
            return None;
        }
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => match decode_completion_line(&line) {
                    Some(StreamEvent::Done) => {
                        self.terminated = true;
                        return Some(StreamEvent::Done);
                    }
                    Some(event) => return Some(event),
                    None => continue,
                },
                Ok(None) => {
                    self.terminated = true;
                    return Some(StreamEvent::Done);
                }
                Err(e) => {
                    tracing::error!("Completion stream failed: {}", e);
                    self.terminated = true;
                    return Some(StreamEvent::Failed(e.to_string()));
                }
            }
        }
    }
}

/// Progress reported by one load-stream line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// 0-100, floor of `100 * module / modules`
    pub percent: u8,
    pub finished: bool,
}

#[derive(Debug, Deserialize)]
struct LoadStatusLine {
    #[serde(default)]
    module: u64,
    #[serde(default)]
    modules: u64,
    #[serde(default)]
    status: String,
}

/// Tracks a model-load stream line by line.
///
/// Reports at most one success: once a line carries `status == "finished"`
/// the tracker ignores everything after it.
pub struct LoadTracker {
    finished: bool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self { finished: false }
    }

    /// Feed one raw line; returns the progress update it carried, if any.
    pub fn observe(&mut self, line: &str) -> Option<LoadProgress> {
        if self.finished {
            return None;
        }
        let payload = data_payload(line)?;
        match serde_json::from_str::<LoadStatusLine>(payload) {
            Ok(status) => {
                let percent = if status.modules == 0 {
                    0
                } else {
                    (100 * status.module / status.modules).min(100) as u8
                };
                let finished = status.status == "finished";
                self.finished = finished;
                Some(LoadProgress { percent, finished })
            }
            Err(e) => {
                tracing::warn!("Skipping malformed load-status line: {}", e);
                None
            }
        }
    }
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain a model-load stream, reporting progress per line.
///
/// Stops consuming at the first `finished` line and returns `Ok`. A stream
/// that ends, or errors, before reporting `finished` did not load the model.
pub async fn track_load(
    mut lines: SseLines,
    mut on_progress: impl FnMut(u8),
) -> Result<(), ApiError> {
    let mut tracker = LoadTracker::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(progress) = tracker.observe(&line) {
                    on_progress(progress.percent);
                    if progress.finished {
                        return Ok(());
                    }
                }
            }
            Ok(None) => return Err(ApiError::LoadIncomplete),
            Err(e) => {
                tracing::error!("Load stream failed: {}", e);
                return Err(ApiError::LoadIncomplete);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_completion_fragments_in_order() {
        let lines = [
            r#"data: {"choices":[{"text":"Hel"}]}"#,
            r#"data: {"choices":[{"text":"lo"}]}"#,
            "data: [DONE]",
        ];
        let events: Vec<_> = lines.iter().filter_map(|l| decode_completion_line(l)).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::Text("Hel".to_string()),
                StreamEvent::Text("lo".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[test]
    fn test_decode_completion_blank_lines_yield_nothing() {
        assert_eq!(decode_completion_line(""), None);
        assert_eq!(decode_completion_line("   "), None);
    }

    #[test]
    fn test_decode_completion_malformed_line_is_skipped() {
        assert_eq!(decode_completion_line("data: {not json"), None);
        // and a later healthy line still decodes
        assert_eq!(
            decode_completion_line(r#"data: {"choices":[{"text":"ok"}]}"#),
            Some(StreamEvent::Text("ok".to_string()))
        );
    }

    #[test]
    fn test_decode_completion_empty_choices_yield_nothing() {
        assert_eq!(decode_completion_line(r#"data: {"choices":[]}"#), None);
    }

    #[test]
    fn test_decode_completion_empty_fragment_is_a_token() {
        // A legitimate empty fragment is still an event, distinct from Failed
        assert_eq!(
            decode_completion_line(r#"data: {"choices":[{"text":""}]}"#),
            Some(StreamEvent::Text(String::new()))
        );
    }

    #[test]
    fn test_tracker_percent_and_finish() {
        let mut tracker = LoadTracker::new();
        let first = tracker
            .observe(r#"data: {"module":1,"modules":4,"status":"loading"}"#)
            .unwrap();
        assert_eq!(first.percent, 25);
        assert!(!first.finished);

        let last = tracker
            .observe(r#"data: {"module":4,"modules":4,"status":"finished"}"#)
            .unwrap();
        assert_eq!(last.percent, 100);
        assert!(last.finished);
    }

    #[test]
    fn test_tracker_ignores_lines_after_finished() {
        let mut tracker = LoadTracker::new();
        tracker
            .observe(r#"data: {"module":4,"modules":4,"status":"finished"}"#)
            .unwrap();
        assert_eq!(
            tracker.observe(r#"data: {"module":5,"modules":4,"status":"loading"}"#),
            None
        );
    }

    #[test]
    fn test_tracker_percent_is_monotone_for_monotone_module() {
        let mut tracker = LoadTracker::new();
        let mut last = 0u8;
        for module in 1..=10u64 {
            let line = format!(
                r#"data: {{"module":{},"modules":10,"status":"loading"}}"#,
                module
            );
            let progress = tracker.observe(&line).unwrap();
            assert!(progress.percent >= last);
            last = progress.percent;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_tracker_percent_floors() {
        let mut tracker = LoadTracker::new();
        let progress = tracker
            .observe(r#"data: {"module":1,"modules":3,"status":"loading"}"#)
            .unwrap();
        assert_eq!(progress.percent, 33);
    }

    #[test]
    fn test_tracker_zero_modules_reports_zero() {
        let mut tracker = LoadTracker::new();
        let progress = tracker
            .observe(r#"data: {"module":0,"modules":0,"status":"loading"}"#)
            .unwrap();
        assert_eq!(progress.percent, 0);
    }

    #[test]
    fn test_tracker_skips_malformed_lines() {
        let mut tracker = LoadTracker::new();
        assert_eq!(tracker.observe("data: {broken"), None);
        assert!(tracker
            .observe(r#"data: {"module":2,"modules":4,"status":"loading"}"#)
            .is_some());
    }
}
