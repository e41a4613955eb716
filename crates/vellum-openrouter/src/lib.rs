// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE vendor adapter for the OpenRouter aggregator.
//!
//! Wire shape is the chat-completions schema shared with the SDK-JSON
//! vendor; this crate reuses those types and adds OpenRouter's attribution
//! headers and the workspace-wide 1000-token output default.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use vellum_core::provider::{ChunkHandler, CompletionProvider};
use vellum_core::stream::forward_sse_deltas;
use vellum_core::transport::{vendor_failure, HttpRequest, Transport};
use vellum_core::types::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS};
use vellum_core::VellumError;
use vellum_openai::types::{ChatRequest, ChatResponse};

/// Default endpoint when the provider descriptor has no override.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Attribution headers requested by the aggregator for app ranking.
const REFERER_HEADER: (&str, &str) = ("http-referer", "https://github.com/vellum-ai/vellum");
const TITLE_HEADER: (&str, &str) = ("x-title", "Vellum");

/// OpenRouter adapter bound to one model.
pub struct OpenRouterProvider {
    name: String,
    model: String,
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl OpenRouterProvider {
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

    fn build_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<HttpRequest, VellumError> {
        let body =
            ChatRequest::from_completion(&self.model, request, DEFAULT_MAX_OUTPUT_TOKENS, stream);
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        Ok(HttpRequest::post_json(url, &body)?
            .bearer_auth(&self.api_key)
            .header(REFERER_HEADER.0, REFERER_HEADER.1)
            .header(TITLE_HEADER.0, TITLE_HEADER.1))
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
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

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use vellum_test_utils::{chunk_collector, request_json, CannedResponse, ScriptedTransport};
    use vellum_transport::HttpTransport;

    use super::*;

    #[tokio::test]
    async fn sends_attribution_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("x-title", "Vellum"))
            .and(header("authorization", "Bearer or-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "routed"}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new(
            "openrouter",
            "meta-llama/llama-3-70b",
            "or-key",
            Some(server.uri()),
            Arc::new(HttpTransport::native().unwrap()),
        );
        let text = provider.fetch(&CompletionRequest::new("s", "c")).await.unwrap();
        assert_eq!(text, "routed");
    }

    #[tokio::test]
    async fn streaming_delivers_deltas_in_order() {
        let transport = Arc::new(ScriptedTransport::with_responses(vec![
            CannedResponse::ok_frames(&[
                "data: {\"choices\":[{\"delta\":{\"content\":\"one \"}}]}\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n\n",
                "data: [DONE]\n\n",
            ]),
        ]));
        let provider = OpenRouterProvider::new(
            "openrouter",
            "m",
            "k",
            None,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        let (handler, chunks) = chunk_collector();
        provider
            .stream(&CompletionRequest::new("s", "c").streaming(true), handler)
            .await
            .unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["one ", "two"]);
    }

    #[tokio::test]
    async fn default_token_ceiling_is_workspace_default() {
        let transport = Arc::new(ScriptedTransport::with_responses(vec![
            CannedResponse::ok_json(&serde_json::json!({"choices": []})),
        ]));
        let provider = OpenRouterProvider::new(
            "openrouter",
            "m",
            "k",
            None,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        provider.fetch(&CompletionRequest::new("s", "c")).await.unwrap();
        let body = request_json(&transport.only_request());
        assert_eq!(body["max_tokens"], 1000);
    }

    #[tokio::test]
    async fn provider_error_carries_status_and_reason() {
        let transport = Arc::new(ScriptedTransport::with_responses(vec![
            CannedResponse::error(429, "Too Many Requests", "try later"),
        ]));
        let provider = OpenRouterProvider::new(
            "openrouter",
            "m",
            "k",
            None,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        let err = provider
            .fetch(&CompletionRequest::new("s", "c"))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("429") && message.contains("Too Many Requests"));
    }
}
