// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the generate-content API, camelCase on the wire.

use serde::{Deserialize, Serialize};

use vellum_core::prompt::{self, Role};
use vellum_core::types::CompletionRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One turn in the conversation. `role` is absent on the dedicated system
/// instruction and `"user"` everywhere this adapter speaks.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    fn instruction(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }

    fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Generate-content request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    /// Builds the vendor body from a completion request.
    ///
    /// With `dedicated_instruction` the system role maps onto the
    /// `systemInstruction` field; without it every composed message rides
    /// in `contents` as a user turn. Model families that reject the
    /// dedicated field pass `false` here regardless of what the request
    /// says about system-prompt support.
    pub fn from_completion(
        request: &CompletionRequest,
        default_max_tokens: u32,
        dedicated_instruction: bool,
    ) -> Self {
        let mut system_instruction = None;
        let mut contents = Vec::with_capacity(3);
        let messages = if dedicated_instruction {
            prompt::compose_messages(request)
        } else {
            prompt::compose_user_messages(request)
        };
        for message in messages {
            match message.role {
                Role::System => system_instruction = Some(Content::instruction(message.text)),
                Role::User => contents.push(Content::user(message.text)),
            }
        }

        Self {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens.unwrap_or(default_max_tokens),
            },
        }
    }
}

/// Generate-content response; the same shape arrives whole on the
/// non-streaming endpoint and incrementally per SSE frame when streaming.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    /// First candidate's part texts concatenated; absent candidates or
    /// parts yield the empty string.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
