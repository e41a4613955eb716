// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge between the completion contract and a push-callback host.
//!
//! Some completions are not performed over HTTP at all: the embedding host
//! (an editor plugin runtime) owns the vendor connection and pushes text
//! fragments back through callbacks. This crate adapts that push model to
//! the pull-style [`CompletionProvider`] contract with a one-shot channel,
//! so `complete()` behaves identically whether the work happened in-process
//! or in the host.
//!
//! The host exposes no role distinction, so every instruction rides as a
//! user message regardless of the request's system-prompt flag.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::debug;

use vellum_core::prompt;
use vellum_core::provider::{ChunkHandler, CompletionProvider};
use vellum_core::types::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS};
use vellum_core::VellumError;

/// One message marshalled to the host.
#[derive(Debug, Clone, Serialize)]
pub struct HostMessage {
    pub role: String,
    pub text: String,
}

/// Completion parameters marshalled to the host.
#[derive(Debug, Clone, Serialize)]
pub struct HostRequest {
    pub model: String,
    pub messages: Vec<HostMessage>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub streaming: bool,
}

impl HostRequest {
    pub fn from_completion(model: &str, request: &CompletionRequest, streaming: bool) -> Self {
        let messages = prompt::compose_user_messages(request)
            .into_iter()
            .map(|message| HostMessage {
                role: "user".to_string(),
                text: message.text,
            })
            .collect();
        Self {
            model: model.to_string(),
            messages,
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            streaming,
        }
    }
}

/// One in-flight host completion. Callbacks may fire from any thread, in
/// any order, and possibly more than once; the bridge guards against that.
pub trait CompletionHandle: Send {
    /// Registers the fragment callback.
    fn on_data(&mut self, callback: Box<dyn FnMut(String) + Send>);
    /// Registers the successful-completion callback.
    fn on_end(&mut self, callback: Box<dyn FnOnce() + Send>);
    /// Registers the failure callback.
    fn on_error(&mut self, callback: Box<dyn FnOnce(String) + Send>);
}

/// The embedding host's completion surface.
pub trait HostBackend: Send + Sync {
    /// Starts a completion in the host and returns the handle its
    /// callbacks will be registered on.
    fn begin_completion(&self, provider_id: &str, request: HostRequest)
        -> Box<dyn CompletionHandle>;
}

type Resolution = Arc<Mutex<Option<oneshot::Sender<Result<(), String>>>>>;

/// Adapter that delegates completions to a [`HostBackend`].
pub struct HostProvider {
    name: String,
    model: String,
    backend: Arc<dyn HostBackend>,
}

impl HostProvider {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        backend: Arc<dyn HostBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            backend,
        }
    }

    /// Wires end/error callbacks into a one-shot resolution. The sender is
    /// taken under a lock, so whichever callback fires first wins and
    /// later invocations are inert.
    fn wire_resolution(
        handle: &mut Box<dyn CompletionHandle>,
    ) -> oneshot::Receiver<Result<(), String>> {
        let (tx, rx) = oneshot::channel();
        let slot: Resolution = Arc::new(Mutex::new(Some(tx)));

        let end_slot = Arc::clone(&slot);
        handle.on_end(Box::new(move || {
            if let Some(tx) = end_slot.lock().ok().and_then(|mut guard| guard.take()) {
                let _ = tx.send(Ok(()));
            }
        }));

        let error_slot = slot;
        handle.on_error(Box::new(move |message| {
            if let Some(tx) = error_slot.lock().ok().and_then(|mut guard| guard.take()) {
                let _ = tx.send(Err(message));
            }
        }));

        rx
    }

    async fn resolve(rx: oneshot::Receiver<Result<(), String>>) -> Result<(), VellumError> {
        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(message)) => Err(VellumError::Provider {
                message,
                source: None,
            }),
            Err(_) => Err(VellumError::Provider {
                message: "host completion was dropped without resolving".to_string(),
                source: None,
            }),
        }
    }
}

#[async_trait]
impl CompletionProvider for HostProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn fetch(&self, request: &CompletionRequest) -> Result<String, VellumError> {
        let host_request = HostRequest::from_completion(&self.model, request, false);
        let mut handle = self.backend.begin_completion(&self.name, host_request);

        let accumulated = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&accumulated);
        handle.on_data(Box::new(move |fragment| {
            if let Ok(mut text) = sink.lock() {
                text.push_str(&fragment);
            }
        }));
        let rx = Self::wire_resolution(&mut handle);

        Self::resolve(rx).await?;
        let text = accumulated
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        debug!(model = %self.model, chars = text.len(), "host completion received");
        Ok(text)
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<(), VellumError> {
        let host_request = HostRequest::from_completion(&self.model, request, true);
        let mut handle = self.backend.begin_completion(&self.name, host_request);

        handle.on_data(Box::new(move |fragment| on_chunk(fragment)));
        let rx = Self::wire_resolution(&mut handle);

        Self::resolve(rx).await
    }
}
