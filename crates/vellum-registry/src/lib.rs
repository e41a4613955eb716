// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider factory.
//!
//! Resolves a logical model id from configuration to a ready adapter,
//! already wrapped in the stall-timeout watchdog. Resolution is pure
//! lookup and construction; no network traffic happens until the first
//! completion call.
//!
//! Model ids with the `plugin:` prefix bypass configuration entirely and
//! are delegated to the registered host backend.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use vellum_config::{ProviderDescriptor, ProviderKind, VellumConfig};
use vellum_core::provider::CompletionProvider;
use vellum_core::transport::Transport;
use vellum_core::watchdog::{StallGuard, DEFAULT_STALL_TIMEOUT};
use vellum_core::VellumError;
use vellum_gemini::GeminiProvider;
use vellum_groq::GroqProvider;
use vellum_ollama::OllamaProvider;
use vellum_openai::OpenAiProvider;
use vellum_openrouter::OpenRouterProvider;
use vellum_plugin::{HostBackend, HostProvider};

mod stub;

pub use stub::{StubProvider, STUB_FRAGMENTS};

/// Model-id prefix marking a completion delegated to the host backend:
/// `plugin:<provider-id>` or `plugin:<provider-id>/<model>`.
pub const PLUGIN_MODEL_PREFIX: &str = "plugin:";

/// Model name handed to the host when the plugin id does not pin one.
const PLUGIN_DEFAULT_MODEL: &str = "default";

/// Factory resolving logical model ids to completion adapters.
pub struct ProviderRegistry {
    config: VellumConfig,
    transport: Arc<dyn Transport>,
    host_backend: Option<Arc<dyn HostBackend>>,
    stall_timeout: Duration,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("config", &self.config)
            .field("stall_timeout", &self.stall_timeout)
            .finish_non_exhaustive()
    }
}

impl ProviderRegistry {
    pub fn new(config: VellumConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            host_backend: None,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
        }
    }

    /// Registers the host backend serving `plugin:` model ids.
    pub fn with_host_backend(mut self, backend: Arc<dyn HostBackend>) -> Self {
        self.host_backend = Some(backend);
        self
    }

    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    /// Resolves a logical model id to its adapter, wrapped in the
    /// stall-timeout watchdog. Performs no I/O.
    pub fn resolve(&self, model_id: &str) -> Result<Arc<dyn CompletionProvider>, VellumError> {
        let inner = self.resolve_inner(model_id)?;
        debug!(model = %model_id, provider = %inner.name(), "resolved completion adapter");
        Ok(Arc::new(StallGuard::with_threshold(inner, self.stall_timeout)))
    }

    /// Display name of a configured provider, for UI surfaces.
    pub fn provider_display_name(&self, provider_id: &str) -> Option<&str> {
        self.config
            .provider(provider_id)
            .map(|descriptor| descriptor.display_name.as_str())
    }

    /// Whether the model's provider accepts a distinguished system role.
    /// Unknown and plugin-delegated models default to `true`.
    pub fn system_prompt_support(&self, model_id: &str) -> bool {
        self.config
            .model(model_id)
            .and_then(|entry| self.config.provider(&entry.provider))
            .map(|descriptor| descriptor.supports_system_prompt)
            .unwrap_or(true)
    }

    fn resolve_inner(&self, model_id: &str) -> Result<Arc<dyn CompletionProvider>, VellumError> {
        if let Some(rest) = model_id.strip_prefix(PLUGIN_MODEL_PREFIX) {
            let Some(backend) = &self.host_backend else {
                return Err(VellumError::Config(format!(
                    "model '{model_id}' is plugin-delegated but no host backend is registered"
                )));
            };
            let (provider_id, model) = rest
                .split_once('/')
                .unwrap_or((rest, PLUGIN_DEFAULT_MODEL));
            if provider_id.is_empty() {
                return Err(VellumError::Config(format!(
                    "model '{model_id}' names no plugin provider"
                )));
            }
            return Ok(Arc::new(HostProvider::new(
                provider_id,
                model,
                Arc::clone(backend),
            )));
        }

        let entry = self.config.model(model_id).ok_or_else(|| {
            VellumError::Config(format!("no provider configured for model '{model_id}'"))
        })?;
        let descriptor = self.config.provider(&entry.provider).ok_or_else(|| {
            VellumError::Config(format!(
                "model '{model_id}' references unknown provider '{}'",
                entry.provider
            ))
        })?;
        self.construct(descriptor, model_id, &entry.model)
    }

    fn construct(
        &self,
        descriptor: &ProviderDescriptor,
        model_id: &str,
        model: &str,
    ) -> Result<Arc<dyn CompletionProvider>, VellumError> {
        let transport = Arc::clone(&self.transport);
        let base_url = descriptor.base_url.clone();

        // The local NDJSON vendor is the only kind that takes no credential.
        if descriptor.kind != ProviderKind::Ollama && descriptor.api_key.is_none() {
            if self.config.testing_mode {
                debug!(provider = %descriptor.id, "testing mode, substituting stub adapter");
                return Ok(Arc::new(StubProvider::new(&descriptor.id, model)));
            }
            return Err(VellumError::Config(format!(
                "provider '{}' has no api key configured for model '{model_id}'",
                descriptor.id
            )));
        }
        let api_key = descriptor.api_key.clone().unwrap_or_default();

        Ok(match descriptor.kind {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                &descriptor.id,
                model,
                api_key,
                base_url,
                transport,
            )),
            ProviderKind::OpenRouter => Arc::new(OpenRouterProvider::new(
                &descriptor.id,
                model,
                api_key,
                base_url,
                transport,
            )),
            ProviderKind::Groq => Arc::new(GroqProvider::new(
                &descriptor.id,
                model,
                api_key,
                base_url,
                transport,
            )),
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(
                &descriptor.id,
                model,
                api_key,
                base_url,
                transport,
            )),
            ProviderKind::Ollama => {
                Arc::new(OllamaProvider::new(&descriptor.id, model, base_url, transport))
            }
        })
    }
}
