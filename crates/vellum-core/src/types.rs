// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request types and shared defaults for the completion contract.

use crate::error::VellumError;

/// Default sampling temperature applied when the caller does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default output-token ceiling for adapters that do not override it.
/// The SDK-JSON adapter uses its own, larger default.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;

/// A single completion invocation.
///
/// `system_prompt` and `content` are required and must be non-empty; every
/// other field carries a stated default. One request value drives both the
/// streaming and non-streaming paths so that identical inputs produce
/// identical vendor-side text.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction text.
    pub system_prompt: String,
    /// Primary content text, always the last message.
    pub content: String,
    /// Optional secondary instruction, placed before `content`.
    pub user_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens. `None` means the adapter's own default.
    pub max_output_tokens: Option<u32>,
    /// Request incremental delivery when a chunk handler is supplied.
    pub streaming: bool,
    /// When false, the system instruction is demoted into the ordinary
    /// message sequence instead of a dedicated role.
    pub system_prompt_support: bool,
}

impl CompletionRequest {
    /// Creates a request with the stated defaults for all optional fields.
    pub fn new(system_prompt: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            content: content.into(),
            user_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: None,
            streaming: false,
            system_prompt_support: true,
        }
    }

    pub fn with_user_prompt(mut self, user_prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(user_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_system_prompt_support(mut self, supported: bool) -> Self {
        self.system_prompt_support = supported;
        self
    }

    /// Rejects requests missing either required text field.
    pub fn validate(&self) -> Result<(), VellumError> {
        if self.system_prompt.is_empty() {
            return Err(VellumError::Config(
                "completion request requires a non-empty system_prompt".into(),
            ));
        }
        if self.content.is_empty() {
            return Err(VellumError::Config(
                "completion request requires non-empty content".into(),
            ));
        }
        Ok(())
    }
}
