// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter for the Gemini generate-content API.
//!
//! Authentication rides in an `x-goog-api-key` header rather than a bearer
//! token, and streaming uses a dedicated endpoint with `alt=sse`. The
//! open-weight "gemma" model family rejects the dedicated system
//! instruction field, so for those models the system prompt is folded into
//! the user turns no matter what the request declares.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use vellum_core::provider::{ChunkHandler, CompletionProvider};
use vellum_core::transport::{vendor_failure, HttpRequest, Transport};
use vellum_core::types::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS};
use vellum_core::VellumError;

pub mod sse;
pub mod types;

use types::{GenerateRequest, GenerateResponse};

/// Default endpoint when the provider descriptor has no override.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini adapter bound to one model.
pub struct GeminiProvider {
    name: String,
    model: String,
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl GeminiProvider {
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

    fn dedicated_instruction(&self) -> bool {
        !self.model.to_lowercase().contains("gemma")
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<HttpRequest, VellumError> {
        let body = GenerateRequest::from_completion(
            request,
            DEFAULT_MAX_OUTPUT_TOKENS,
            self.dedicated_instruction(),
        );
        let verb = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        let url = format!(
            "{}/models/{}:{verb}",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        Ok(HttpRequest::post_json(url, &body)?.header(API_KEY_HEADER, &self.api_key))
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
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

        let mut frames = sse::parse_event_stream(body);
        while let Some(frame) = frames.next().await {
            let text = frame?.text();
            if !text.is_empty() {
                on_chunk(text);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use vellum_test_utils::{chunk_collector, has_header, request_json, CannedResponse, ScriptedTransport};
    use vellum_transport::HttpTransport;

    use super::*;

    fn scripted_provider(
        model: &str,
        responses: Vec<CannedResponse>,
    ) -> (GeminiProvider, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::with_responses(responses));
        let provider = GeminiProvider::new(
            "gemini",
            model,
            "g-key",
            None,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        (provider, transport)
    }

    #[tokio::test]
    async fn fetch_hits_generate_content_with_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "answer"}]}}]
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(
            "gemini",
            "gemini-1.5-flash",
            "g-key",
            Some(server.uri()),
            Arc::new(HttpTransport::native().unwrap()),
        );
        let text = provider.fetch(&CompletionRequest::new("s", "c")).await.unwrap();
        assert_eq!(text, "answer");
    }

    #[tokio::test]
    async fn system_instruction_is_dedicated_by_default() {
        let (provider, transport) = scripted_provider(
            "gemini-1.5-flash",
            vec![CannedResponse::ok_json(&serde_json::json!({"candidates": []}))],
        );
        provider.fetch(&CompletionRequest::new("S", "C")).await.unwrap();
        let body = request_json(&transport.only_request());
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "S");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "C");
    }

    #[tokio::test]
    async fn gemma_models_fold_the_system_prompt_into_user_turns() {
        let (provider, transport) = scripted_provider(
            "Gemma-2-9b-it",
            vec![CannedResponse::ok_json(&serde_json::json!({"candidates": []}))],
        );
        provider.fetch(&CompletionRequest::new("S", "C")).await.unwrap();
        let body = request_json(&transport.only_request());
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "S");
        assert_eq!(body["contents"][1]["parts"][0]["text"], "C");
    }

    #[tokio::test]
    async fn auth_never_uses_a_bearer_token() {
        let (provider, transport) = scripted_provider(
            "gemini-1.5-flash",
            vec![CannedResponse::ok_json(&serde_json::json!({"candidates": []}))],
        );
        provider.fetch(&CompletionRequest::new("s", "c")).await.unwrap();
        let request = transport.only_request();
        assert!(!has_header(&request, "authorization"));
        assert!(has_header(&request, "x-goog-api-key"));
    }

    #[tokio::test]
    async fn streaming_forwards_frame_texts_in_order() {
        let (provider, transport) = scripted_provider(
            "gemini-1.5-flash",
            vec![CannedResponse::ok_frames(&[
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"one \"}]}}]}\n\n",
                "data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n\n",
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"two\"}]}}]}\n\n",
            ])],
        );
        let (handler, chunks) = chunk_collector();
        provider
            .stream(&CompletionRequest::new("s", "c").streaming(true), handler)
            .await
            .unwrap();
        assert_eq!(*chunks.lock().unwrap(), vec!["one ", "two"]);

        let request = transport.only_request();
        assert!(request.url.ends_with(":streamGenerateContent?alt=sse"));
    }

    #[tokio::test]
    async fn missing_stream_body_is_reported() {
        let (provider, _) = scripted_provider("gemini-1.5-flash", vec![CannedResponse::bodyless(200)]);
        let (handler, _) = chunk_collector();
        let err = provider
            .stream(&CompletionRequest::new("s", "c").streaming(true), handler)
            .await
            .unwrap_err();
        assert!(matches!(err, VellumError::StreamUnavailable));
    }
}
