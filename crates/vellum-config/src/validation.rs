// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the configuration.

use std::collections::HashSet;

use vellum_core::VellumError;

use crate::model::VellumConfig;

/// Checks referential integrity of the loaded configuration: unique
/// provider/model ids and no model pointing at a missing provider.
///
/// Credential presence is deliberately not checked here; that is the
/// factory's concern because testing mode changes the outcome.
pub fn validate_config(config: &VellumConfig) -> Result<(), VellumError> {
    let mut provider_ids = HashSet::new();
    for provider in &config.providers {
        if provider.id.is_empty() {
            return Err(VellumError::Config("provider with empty id".into()));
        }
        if !provider_ids.insert(provider.id.as_str()) {
            return Err(VellumError::Config(format!(
                "duplicate provider id '{}'",
                provider.id
            )));
        }
    }

    let mut model_ids = HashSet::new();
    for model in &config.models {
        if !model_ids.insert(model.id.as_str()) {
            return Err(VellumError::Config(format!(
                "duplicate model id '{}'",
                model.id
            )));
        }
        if !provider_ids.contains(model.provider.as_str()) {
            return Err(VellumError::Config(format!(
                "model '{}' references unknown provider '{}'",
                model.id, model.provider
            )));
        }
    }

    Ok(())
}
