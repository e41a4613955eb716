// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vellum: a provider-agnostic LLM text completion layer.
//!
//! One contract (`complete` over a [`CompletionProvider`]) spans five HTTP
//! vendor protocols plus plugin-delegated completions, with a shared
//! stall-timeout watchdog and uniform error taxonomy. This facade crate
//! re-exports the public surface and wires configuration to the concrete
//! transport and registry.
//!
//! ```no_run
//! use vellum::{bootstrap_from_str, CompletionProvider, CompletionRequest};
//!
//! # async fn run() -> Result<(), vellum::VellumError> {
//! let registry = bootstrap_from_str(r#"
//!     [[providers]]
//!     id = "openai"
//!     display_name = "OpenAI"
//!     kind = "openai"
//!     api_key = "sk-..."
//!
//!     [[models]]
//!     id = "fast"
//!     model = "gpt-4o-mini"
//!     provider = "openai"
//! "#)?;
//!
//! let provider = registry.resolve("fast")?;
//! let request = CompletionRequest::new("You are terse.", "Summarize: ...");
//! let text = provider.complete(&request, None).await?;
//! # Ok(())
//! # }
//! ```

pub use vellum_config::{
    load_and_validate, load_and_validate_str, ModelEntry, ProviderDescriptor, ProviderKind,
    VellumConfig,
};
pub use vellum_core::provider::{ChunkHandler, CompletionProvider};
pub use vellum_core::transport::{HttpRequest, HttpResponse, Transport};
pub use vellum_core::types::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
pub use vellum_core::watchdog::{StallGuard, DEFAULT_STALL_TIMEOUT};
pub use vellum_core::VellumError;
pub use vellum_plugin::{CompletionHandle, HostBackend, HostRequest};
pub use vellum_registry::{ProviderRegistry, PLUGIN_MODEL_PREFIX};
pub use vellum_transport::HttpTransport;

/// Initializes the tracing subscriber. `debug` raises this crate's
/// hierarchy to debug level; `RUST_LOG` overrides both.
pub fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vellum={level},warn")));

    // A second initialization (tests, embedding hosts) is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}

/// Loads configuration from the XDG hierarchy and builds a ready registry:
/// transport selected by `use_alternate_transport`, logging level by
/// `debug_logging`.
pub fn bootstrap() -> Result<ProviderRegistry, VellumError> {
    let config = load_and_validate()?;
    registry_from_config(config)
}

/// Same as [`bootstrap`] but reads configuration from a TOML string.
pub fn bootstrap_from_str(toml_content: &str) -> Result<ProviderRegistry, VellumError> {
    let config = load_and_validate_str(toml_content)?;
    registry_from_config(config)
}

fn registry_from_config(config: VellumConfig) -> Result<ProviderRegistry, VellumError> {
    init_tracing(config.debug_logging);
    let transport = HttpTransport::from_flag(config.use_alternate_transport)?;
    Ok(ProviderRegistry::new(config, transport))
}
