// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the chat-completions JSON schema.
//!
//! The SSE vendors in this workspace speak the same request shape, so they
//! reuse these types rather than redefining them.

use serde::{Deserialize, Serialize};

use vellum_core::prompt::{self, Role};
use vellum_core::types::CompletionRequest;

/// One role-tagged message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat-completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl ChatRequest {
    /// Builds the vendor body from a completion request, applying the
    /// shared role-composition rules and the adapter's token default.
    pub fn from_completion(
        model: &str,
        request: &CompletionRequest,
        default_max_tokens: u32,
        stream: bool,
    ) -> Self {
        let messages = prompt::compose_messages(request)
            .into_iter()
            .map(|message| ChatMessage {
                role: match message.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                },
                content: message.text,
            })
            .collect();

        Self {
            model: model.to_string(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_output_tokens.unwrap_or(default_max_tokens),
            stream,
        }
    }
}

/// Non-streaming chat-completions response.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

/// `content` is nullable on the wire; adapters decide whether `null` is
/// tolerated (the null-content vendor quirk) or collapses to empty text.
#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// First choice's full message text; absent or `null` content yields
    /// the empty string.
    pub fn text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
