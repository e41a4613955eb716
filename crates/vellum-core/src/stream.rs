// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunk-parser utilities shared by the vendor adapters.
//!
//! Stateless extraction helpers for the chat-completions JSON shape, the
//! SSE drive loop used by the SSE vendors, and the byte-level line buffer
//! used by the NDJSON vendor. One corrupt frame never aborts a stream:
//! malformed payloads are skipped and decoding continues.

use eventsource_stream::{EventStreamError, Eventsource};
use futures::StreamExt;
use serde_json::Value;
use tracing::trace;

use crate::error::VellumError;
use crate::provider::ChunkHandler;
use crate::transport::ByteStream;

/// SSE payload marking end of content extraction.
pub const SSE_DONE_SENTINEL: &str = "[DONE]";

/// Extracts the first choice's incremental delta text from one decoded
/// chat-completions streaming payload. Empty deltas yield `None`.
pub fn sse_delta_text(payload: &Value) -> Option<String> {
    payload
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Extracts the first choice's full message text from one decoded
/// chat-completions response payload.
///
/// Absent or `null` content yields `None`; callers that must tolerate the
/// null-content vendor quirk map that to the empty string.
pub fn sse_message_text(payload: &Value) -> Option<String> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_owned)
}

/// Drives an SSE response body to completion, forwarding every non-empty
/// delta to `on_chunk` in arrival order.
///
/// Only `data:` payloads are meaningful; the SSE layer reassembles frames
/// split across network reads. A trimmed `[DONE]` sentinel stops content
/// extraction while the remaining stream is drained, so trailing garbage
/// after the sentinel cannot fail an otherwise-healthy call. Frames that
/// fail to parse as JSON are skipped.
pub async fn forward_sse_deltas(
    body: ByteStream,
    on_chunk: &ChunkHandler,
) -> Result<(), VellumError> {
    let mut events = body.eventsource();
    let mut done = false;

    while let Some(item) = events.next().await {
        let event = match item {
            Ok(event) => event,
            Err(EventStreamError::Transport(e)) => return Err(e),
            Err(e) => {
                trace!(error = %e, "skipping malformed SSE frame");
                continue;
            }
        };
        if done {
            continue;
        }
        let data = event.data.trim();
        if data.is_empty() {
            continue;
        }
        if data == SSE_DONE_SENTINEL {
            done = true;
            continue;
        }
        match serde_json::from_str::<Value>(data) {
            Ok(payload) => {
                if let Some(text) = sse_delta_text(&payload) {
                    on_chunk(text);
                }
            }
            Err(e) => trace!(error = %e, "skipping unparseable SSE payload"),
        }
    }

    Ok(())
}

/// Byte-level decode buffer for newline-delimited protocols.
///
/// Bytes are appended as they arrive; complete lines are handed back and
/// the trailing partial line is retained for the next read. Conversion to
/// text happens per complete line, so multi-byte characters split across
/// reads are reassembled correctly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every newly completed line, newline and
    /// trailing carriage return stripped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = &raw[..raw.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            lines.push(String::from_utf8_lossy(line).into_owned());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;

    use super::*;

    fn collector() -> (ChunkHandler, Arc<Mutex<Vec<String>>>) {
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&chunks);
        let handler: ChunkHandler = Arc::new(move |fragment: String| {
            sink.lock().unwrap().push(fragment);
        });
        (handler, chunks)
    }

    fn sse_body(frames: &'static [&'static str]) -> ByteStream {
        Box::pin(futures::stream::iter(
            frames.iter().map(|f| Ok(Bytes::from_static(f.as_bytes()))),
        ))
    }

    #[test]
    fn delta_text_reads_first_choice() {
        let payload: Value =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#).unwrap();
        assert_eq!(sse_delta_text(&payload), Some("Hi".to_string()));
    }

    #[test]
    fn delta_text_ignores_empty_and_missing() {
        let empty: Value =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":""}}]}"#).unwrap();
        assert_eq!(sse_delta_text(&empty), None);
        let missing: Value = serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert_eq!(sse_delta_text(&missing), None);
    }

    #[test]
    fn message_text_reads_first_choice() {
        let payload: Value =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"Hello"}}]}"#).unwrap();
        assert_eq!(sse_message_text(&payload), Some("Hello".to_string()));
    }

    #[test]
    fn message_text_null_is_none() {
        let payload: Value =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(sse_message_text(&payload), None);
    }

    #[tokio::test]
    async fn forwards_deltas_until_done() {
        let (handler, chunks) = collector();
        let body = sse_body(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        forward_sse_deltas(body, &handler).await.unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["Hi", " there"]);
    }

    #[tokio::test]
    async fn frames_split_across_reads_are_reassembled() {
        let (handler, chunks) = collector();
        let body = sse_body(&[
            "data: {\"choices\":[{\"delta\":",
            "{\"content\":\"split\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        forward_sse_deltas(body, &handler).await.unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["split"]);
    }

    #[tokio::test]
    async fn corrupt_frame_does_not_abort_stream() {
        let (handler, chunks) = collector();
        let body = sse_body(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {not json}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        forward_sse_deltas(body, &handler).await.unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn lines_after_done_are_drained_without_effect() {
        let (handler, chunks) = collector();
        let body = sse_body(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {malformed\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n",
        ]);
        forward_sse_deltas(body, &handler).await.unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["x"]);
    }

    #[tokio::test]
    async fn non_data_lines_are_ignored() {
        let (handler, chunks) = collector();
        let body = sse_body(&[
            ": keep-alive\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"y\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        forward_sse_deltas(body, &handler).await.unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["y"]);
    }

    #[test]
    fn line_buffer_retains_partial_tail() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"{\"response\":\"a\"").is_empty());
        let lines = buffer.push(b"}\n{\"resp");
        assert_eq!(lines, vec!["{\"response\":\"a\"}"]);
        let lines = buffer.push(b"onse\":\"b\"}\n");
        assert_eq!(lines, vec!["{\"response\":\"b\"}"]);
    }

    #[test]
    fn line_buffer_strips_carriage_returns() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push(b"one\r\ntwo\n");
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn line_buffer_reassembles_split_multibyte() {
        let mut buffer = LineBuffer::new();
        let text = "héllo\n".as_bytes();
        assert!(buffer.push(&text[..3]).is_empty());
        let lines = buffer.push(&text[3..]);
        assert_eq!(lines, vec!["héllo"]);
    }
}
