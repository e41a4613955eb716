// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vellum.toml` > `~/.config/vellum/vellum.toml`
//! with environment variable overrides via the `VELLUM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VellumConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/vellum/vellum.toml` (user XDG config)
/// 3. `./vellum.toml` (local directory)
/// 4. `VELLUM_*` environment variables
pub fn load_config() -> Result<VellumConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VellumConfig::default()))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vellum/vellum.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vellum.toml"))
        .merge(Env::prefixed("VELLUM_"))
        .extract()
}

/// Load configuration from a TOML string only (no file hierarchy).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VellumConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VellumConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VellumConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VellumConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VELLUM_"))
        .extract()
}

#[cfg(test)]
mod tests {
    use crate::model::ProviderKind;

    use super::*;

    #[test]
    fn loads_full_config_from_toml() {
        let config = load_config_from_str(
            r#"
            use_alternate_transport = true
            debug_logging = true

            [[providers]]
            id = "openai"
            display_name = "OpenAI"
            kind = "openai"
            api_key = "sk-test"

            [[providers]]
            id = "ollama"
            display_name = "Ollama"
            kind = "ollama"
            base_url = "http://10.0.0.2:11434"

            [[models]]
            id = "default"
            model = "gpt-4o-mini"
            provider = "openai"
            "#,
        )
        .unwrap();

        assert!(config.use_alternate_transport);
        assert!(config.debug_logging);
        assert!(!config.testing_mode);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.provider("openai").unwrap().kind, ProviderKind::OpenAi);
        assert_eq!(
            config.provider("ollama").unwrap().base_url.as_deref(),
            Some("http://10.0.0.2:11434")
        );
        assert_eq!(config.model("default").unwrap().provider, "openai");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.providers.is_empty());
        assert!(config.models.is_empty());
        assert!(!config.use_alternate_transport);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(load_config_from_str("no_such_key = 1").is_err());
    }
}
