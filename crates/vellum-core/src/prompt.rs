// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message-role composition shared by every adapter.
//!
//! The ordering invariant is fixed: system instruction first (when conveyed
//! at all), optional secondary user instruction next, primary content last.
//! Vendors differ only in how these conceptual roles are spelled on the wire.

use crate::types::CompletionRequest;

/// Conceptual message role, mapped to vendor role names by each adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

/// One composed message before vendor serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub text: String,
}

impl PromptMessage {
    fn system(text: &str) -> Self {
        Self {
            role: Role::System,
            text: text.to_owned(),
        }
    }

    fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_owned(),
        }
    }
}

/// Composes the message sequence for role-based vendors.
///
/// With system-prompt support the system instruction keeps its dedicated
/// role; without it the instruction is demoted to the head of the ordinary
/// user sequence.
pub fn compose_messages(request: &CompletionRequest) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(3);
    if request.system_prompt_support {
        messages.push(PromptMessage::system(&request.system_prompt));
    } else {
        messages.push(PromptMessage::user(&request.system_prompt));
    }
    if let Some(user_prompt) = &request.user_prompt {
        messages.push(PromptMessage::user(user_prompt));
    }
    messages.push(PromptMessage::user(&request.content));
    messages
}

/// Composes the message sequence with every instruction folded into
/// ordinary user roles, for vendors that expose no role distinction.
pub fn compose_user_messages(request: &CompletionRequest) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(3);
    messages.push(PromptMessage::user(&request.system_prompt));
    if let Some(user_prompt) = &request.user_prompt {
        messages.push(PromptMessage::user(user_prompt));
    }
    messages.push(PromptMessage::user(&request.content));
    messages
}

/// Joins all instruction texts into one newline-separated prompt string,
/// in composition order, for vendors that take a single prompt field.
pub fn flat_prompt(request: &CompletionRequest) -> String {
    let mut parts = Vec::with_capacity(3);
    parts.push(request.system_prompt.as_str());
    if let Some(user_prompt) = &request.user_prompt {
        parts.push(user_prompt.as_str());
    }
    parts.push(request.content.as_str());
    parts.join("\n")
}
