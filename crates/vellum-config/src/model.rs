// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vellum completion layer.
//!
//! This layer only reads configuration; the host application owns and
//! persists it. All structs use `#[serde(deny_unknown_fields)]` to reject
//! unrecognized keys at load time.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Wire protocol family of a configured provider. Selects which adapter
/// constructor the factory invokes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// SDK-JSON vendor (chat-completions JSON, 4000-token default).
    OpenAi,
    /// SSE vendor A.
    OpenRouter,
    /// SSE vendor B (null-content-as-empty quirk).
    Groq,
    /// NDJSON local-inference vendor.
    Ollama,
    /// SDK-stream vendor (typed event stream).
    Gemini,
}

/// Configuration record identifying a vendor account/endpoint, independent
/// of any one model. Immutable once loaded; adapters borrow its data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderDescriptor {
    /// Stable identifier referenced by model entries.
    pub id: String,
    /// Human-readable name for UI display.
    pub display_name: String,
    /// Wire protocol family.
    pub kind: ProviderKind,
    /// Credential attached to outbound requests. Optional: the local
    /// NDJSON vendor needs none, and testing mode substitutes a stub.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint override. `None` uses the vendor default.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Whether the vendor accepts a distinguished system role.
    #[serde(default = "default_true")]
    pub supports_system_prompt: bool,
}

/// A logical model pointing at one configured provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    /// Logical identifier callers resolve by.
    pub id: String,
    /// Vendor-specific model name sent on the wire.
    pub model: String,
    /// `ProviderDescriptor` id this model belongs to.
    pub provider: String,
}

/// Top-level Vellum configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VellumConfig {
    #[serde(default)]
    pub providers: Vec<ProviderDescriptor>,

    #[serde(default)]
    pub models: Vec<ModelEntry>,

    /// Use the sandboxed transport build instead of the native one.
    #[serde(default)]
    pub use_alternate_transport: bool,

    /// Substitute stub adapters for providers without credentials.
    #[serde(default)]
    pub testing_mode: bool,

    /// Enable structured request/response debug logging.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_true() -> bool {
    true
}

impl VellumConfig {
    /// Looks up a provider descriptor by id.
    pub fn provider(&self, id: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Looks up a model entry by its logical id.
    pub fn model(&self, id: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|m| m.id == id)
    }
}
