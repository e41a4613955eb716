// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vellum completion layer.
//!
//! This crate defines the provider-agnostic completion contract, the error
//! taxonomy, the injected transport abstraction, shared chunk-parser
//! utilities, and the stall-timeout watchdog. Vendor adapter crates build
//! on these pieces; nothing here talks to a concrete network client.

pub mod error;
pub mod prompt;
pub mod provider;
pub mod stream;
pub mod transport;
pub mod types;
pub mod watchdog;

pub use error::VellumError;
pub use provider::{ChunkHandler, CompletionProvider};
pub use transport::{ByteStream, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{CompletionRequest, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
pub use watchdog::{ActivityTracker, DEFAULT_STALL_TIMEOUT, StallGuard};
