// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end flows: configuration text in, completion text out, with the
//! transport scripted so no test touches the network.

use std::sync::Arc;

use vellum::{
    load_and_validate_str, CompletionHandle, CompletionProvider, CompletionRequest, HostBackend,
    HostRequest, ProviderRegistry, Transport, VellumError,
};
use vellum_test_utils::{chunk_collector, request_json, CannedResponse, ScriptedTransport};

const CONFIG: &str = r#"
[[providers]]
id = "openai"
display_name = "OpenAI"
kind = "openai"
api_key = "sk-test"

[[providers]]
id = "local"
display_name = "Local Ollama"
kind = "ollama"

[[models]]
id = "fast"
model = "gpt-4o-mini"
provider = "openai"

[[models]]
id = "offline"
model = "llama3"
provider = "local"
"#;

fn registry_over(
    responses: Vec<CannedResponse>,
) -> (ProviderRegistry, Arc<ScriptedTransport>) {
    let config = load_and_validate_str(CONFIG).unwrap();
    let transport = Arc::new(ScriptedTransport::with_responses(responses));
    let registry = ProviderRegistry::new(config, Arc::clone(&transport) as Arc<dyn Transport>);
    (registry, transport)
}

#[tokio::test]
async fn non_streaming_completion_returns_full_text_and_fires_handler_once() {
    let (registry, transport) = registry_over(vec![CannedResponse::ok_json(&serde_json::json!({
        "choices": [{"message": {"content": "the answer"}}]
    }))]);

    let provider = registry.resolve("fast").unwrap();
    let request = CompletionRequest::new("You are terse.", "What is it?");
    let (handler, chunks) = chunk_collector();
    let result = provider.complete(&request, Some(handler)).await.unwrap();

    assert_eq!(result.as_deref(), Some("the answer"));
    assert_eq!(*chunks.lock().unwrap(), vec!["the answer"]);

    let sent = transport.only_request();
    assert!(sent.url.ends_with("/chat/completions"));
    let body = request_json(&sent);
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 4000);
}

#[tokio::test]
async fn streaming_completion_delivers_deltas_and_resolves_none() {
    let (registry, _) = registry_over(vec![CannedResponse::ok_frames(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    ])]);

    let provider = registry.resolve("fast").unwrap();
    let request = CompletionRequest::new("s", "c").streaming(true);
    let (handler, chunks) = chunk_collector();
    let result = provider.complete(&request, Some(handler)).await.unwrap();

    assert_eq!(result, None);
    assert_eq!(chunks.lock().unwrap().join(""), "Hello");
}

#[tokio::test]
async fn local_vendor_round_trip_uses_the_flat_prompt() {
    let (registry, transport) = registry_over(vec![CannedResponse::ok_json(&serde_json::json!({
        "response": "local answer",
        "done": true
    }))]);

    let provider = registry.resolve("offline").unwrap();
    let text = provider
        .fetch(&CompletionRequest::new("S", "C").with_user_prompt("U"))
        .await
        .unwrap();
    assert_eq!(text, "local answer");

    let body = request_json(&transport.only_request());
    assert_eq!(body["prompt"], "S\nU\nC");
}

#[tokio::test]
async fn vendor_failure_surfaces_as_provider_error_with_status() {
    let (registry, _) = registry_over(vec![CannedResponse::error(
        401,
        "Unauthorized",
        "bad key",
    )]);

    let provider = registry.resolve("fast").unwrap();
    let err = provider
        .fetch(&CompletionRequest::new("s", "c"))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("Unauthorized"));
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_any_request_is_sent() {
    let (registry, transport) = registry_over(vec![]);

    let provider = registry.resolve("fast").unwrap();
    let err = provider
        .complete(&CompletionRequest::new("", "c"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, VellumError::Config(_)));
    assert!(transport.requests().is_empty());
}

struct EchoBackend;

struct EchoHandle {
    data: Option<Box<dyn FnMut(String) + Send>>,
    end: Option<Box<dyn FnOnce() + Send>>,
    error: Option<Box<dyn FnOnce(String) + Send>>,
    registered: usize,
}

impl CompletionHandle for EchoHandle {
    fn on_data(&mut self, callback: Box<dyn FnMut(String) + Send>) {
        self.data = Some(callback);
        self.maybe_play();
    }

    fn on_end(&mut self, callback: Box<dyn FnOnce() + Send>) {
        self.end = Some(callback);
        self.maybe_play();
    }

    fn on_error(&mut self, callback: Box<dyn FnOnce(String) + Send>) {
        self.error = Some(callback);
        self.maybe_play();
    }
}

impl EchoHandle {
    fn maybe_play(&mut self) {
        self.registered += 1;
        if self.registered == 3 {
            if let Some(callback) = self.data.as_mut() {
                callback("from the host".to_string());
            }
            if let Some(callback) = self.end.take() {
                callback();
            }
        }
    }
}

impl HostBackend for EchoBackend {
    fn begin_completion(&self, _: &str, _: HostRequest) -> Box<dyn CompletionHandle> {
        Box::new(EchoHandle {
            data: None,
            end: None,
            error: None,
            registered: 0,
        })
    }
}

#[tokio::test]
async fn plugin_model_reference_is_served_by_the_host_backend() {
    let (registry, transport) = registry_over(vec![]);
    let registry = registry.with_host_backend(Arc::new(EchoBackend));

    let provider = registry.resolve("plugin:notes-llm").unwrap();
    let text = provider
        .fetch(&CompletionRequest::new("s", "c"))
        .await
        .unwrap();
    assert_eq!(text, "from the host");
    assert!(transport.requests().is_empty());
}
