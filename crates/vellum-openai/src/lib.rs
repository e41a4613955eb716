// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SDK-JSON vendor adapter.
//!
//! Speaks the chat-completions JSON schema: role-tagged messages in, one
//! `choices` array out, with SSE `data:` framing and a `[DONE]` sentinel
//! when streaming. This vendor's output ceiling defaults to 4000 tokens,
//! larger than the workspace-wide default.

pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use vellum_core::provider::{ChunkHandler, CompletionProvider};
use vellum_core::stream::forward_sse_deltas;
use vellum_core::transport::{vendor_failure, HttpRequest, Transport};
use vellum_core::types::CompletionRequest;
use vellum_core::VellumError;

use crate::types::{ChatRequest, ChatResponse};

/// Default endpoint when the provider descriptor has no override.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// This vendor's own output-token default.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4000;

/// Chat-completions adapter bound to one model.
pub struct OpenAiProvider {
    name: String,
    model: String,
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl OpenAiProvider {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            transport,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<HttpRequest, VellumError> {
        let body =
            ChatRequest::from_completion(&self.model, request, DEFAULT_MAX_OUTPUT_TOKENS, stream);
        Ok(HttpRequest::post_json(self.endpoint(), &body)?.bearer_auth(&self.api_key))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
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
        let parsed: ChatResponse = response.json().await?;
        let text = parsed.text();
        debug!(model = %self.model, chars = text.len(), "completion received");
        Ok(text)
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
        let Some(body) = response.into_body() else {
            return Err(VellumError::StreamUnavailable);
        };
        forward_sse_deltas(body, &on_chunk).await
    }
}
