// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NDJSON adapter for a local inference server.
//!
//! The vendor takes one flat prompt string (system, optional user
//! instruction, and content joined by newlines, in that order) and streams
//! one JSON object per line with `response` text and a `done` flag.
//! Local endpoints take no authorization, so this adapter never attaches a
//! credential header even when one is configured.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use vellum_core::prompt;
use vellum_core::provider::{ChunkHandler, CompletionProvider};
use vellum_core::stream::LineBuffer;
use vellum_core::transport::{vendor_failure, HttpRequest, Transport};
use vellum_core::types::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS};
use vellum_core::VellumError;

/// Default endpoint when the provider descriptor has no override.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// `/api/generate` request body.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Non-streaming `/api/generate` response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// One streamed NDJSON line.
#[derive(Debug, Deserialize)]
struct GenerateFrame {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
}

/// Local-inference adapter bound to one model.
pub struct OllamaProvider {
    name: String,
    model: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl OllamaProvider {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        base_url: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            transport,
        }
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<HttpRequest, VellumError> {
        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt::flat_prompt(request),
            stream,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request
                    .max_output_tokens
                    .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            },
        };
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        HttpRequest::post_json(url, &body)
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn fetch(&self, request: &CompletionRequest) -> Result<String, VellumError> {
        let response = self.transport.fetch(self.build_request(request, false)?).await?;
        if !response.ok() {
            return Err(vendor_failure(response).await);
        }
        let parsed: GenerateResponse = response.json().await?;
        debug!(model = %self.model, chars = parsed.response.len(), "completion received");
        Ok(parsed.response)
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<(), VellumError> {
        let response = self.transport.fetch(self.build_request(request, true)?).await?;
        if !response.ok() {
            return Err(vendor_failure(response).await);
        }
        let Some(mut body) = response.into_body() else {
            return Err(VellumError::StreamUnavailable);
        };

        let mut lines = LineBuffer::new();
        'read: while let Some(chunk) = body.next().await {
            for line in lines.push(&chunk?) {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<GenerateFrame>(&line) {
                    Ok(frame) => {
                        if let Some(text) = frame.response {
                            if !text.is_empty() {
                                on_chunk(text);
                            }
                        }
                        // done ends the loop immediately; buffered input
                        // past this line is discarded.
                        if frame.done {
                            break 'read;
                        }
                    }
                    Err(e) => trace!(error = %e, "skipping malformed NDJSON line"),
                }
            }
        }
        Ok(())
    }
}
