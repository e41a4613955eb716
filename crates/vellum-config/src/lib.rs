// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Vellum completion layer.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides. The host application owns the settings store; this
//! layer treats the loaded configuration as read-only input.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ModelEntry, ProviderDescriptor, ProviderKind, VellumConfig};
pub use validation::validate_config;

use vellum_core::VellumError;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<VellumConfig, VellumError> {
    let config = loader::load_config()
        .map_err(|e| VellumError::Config(format!("failed to load configuration: {e}")))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<VellumConfig, VellumError> {
    let config = loader::load_config_from_str(toml_content)
        .map_err(|e| VellumError::Config(format!("failed to load configuration: {e}")))?;
    validation::validate_config(&config)?;
    Ok(config)
}
