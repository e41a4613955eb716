// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vellum completion layer.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the completion contract, adapters,
/// transport, and factory.
///
/// Nothing in this layer retries: every variant is surfaced to the caller
/// exactly once. Malformed individual stream frames are the only locally
/// recovered condition and never appear here.
#[derive(Debug, Error)]
pub enum VellumError {
    /// Unresolvable model, provider, or credential (factory/config errors).
    #[error("configuration error: {0}")]
    Config(String),

    /// The vendor reported a non-success status or an in-band failure.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network-level failure, propagated unchanged from the transport.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A streaming completion was requested but the response has no
    /// readable body.
    #[error("streaming requested but the response body is not readable")]
    StreamUnavailable,

    /// The stall-timeout watchdog fired: no forward progress within the
    /// configured inactivity window.
    #[error("no response activity for {} ms, completion timed out", idle.as_millis())]
    Timeout { idle: Duration },

    /// Internal or unexpected errors (task join failures and the like).
    #[error("internal error: {0}")]
    Internal(String),
}

impl VellumError {
    /// Provider error from a plain message.
    pub fn provider(message: impl Into<String>) -> Self {
        VellumError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Provider error for a non-success HTTP status. The message always
    /// embeds both the numeric status code and the reason text.
    pub fn provider_status(status: u16, reason: &str, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("vendor returned status {status} {reason}")
        } else {
            format!("vendor returned status {status} {reason}: {}", body.trim())
        };
        VellumError::Provider {
            message,
            source: None,
        }
    }

    /// Transport error from a plain message.
    pub fn transport(message: impl Into<String>) -> Self {
        VellumError::Transport {
            message: message.into(),
            source: None,
        }
    }
}
