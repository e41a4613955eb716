// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE parser for streaming generate-content responses.
//!
//! The streaming endpoint emits unnamed SSE events whose `data` payload is
//! one [`GenerateResponse`] per frame. Frames that fail to decode are
//! skipped; transport failures end the stream with an error.

use std::pin::Pin;

use eventsource_stream::{EventStreamError, Eventsource};
use futures::stream::{Stream, StreamExt};
use tracing::trace;

use vellum_core::transport::ByteStream;
use vellum_core::VellumError;

use crate::types::GenerateResponse;

/// Parses a streaming response body into typed generate-content frames.
pub fn parse_event_stream(
    body: ByteStream,
) -> Pin<Box<dyn Stream<Item = Result<GenerateResponse, VellumError>> + Send>> {
    let events = body.eventsource();

    let mapped = events.filter_map(|item| async move {
        match item {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() {
                    return None;
                }
                match serde_json::from_str::<GenerateResponse>(data) {
                    Ok(frame) => Some(Ok(frame)),
                    Err(e) => {
                        trace!(error = %e, "skipping unparseable SSE payload");
                        None
                    }
                }
            }
            Err(EventStreamError::Transport(e)) => Some(Err(e)),
            Err(e) => {
                trace!(error = %e, "skipping malformed SSE frame");
                None
            }
        }
    });

    Box::pin(mapped)
}
