// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion contract every vendor adapter implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::VellumError;
use crate::types::CompletionRequest;

/// Callback receiving incremental text fragments in arrival order.
pub type ChunkHandler = Arc<dyn Fn(String) + Send + Sync>;

/// One vendor-specific implementation of the completion contract.
///
/// Adapters implement the two primitive operations; [`complete`] is the
/// caller-facing entry point and encodes the shared contract rules:
///
/// - streaming with a handler: every non-empty delta is delivered exactly
///   once, in order, and the call resolves with `None`;
/// - otherwise: the full text is fetched and returned, and a supplied
///   handler is invoked exactly once with the complete non-empty result
///   (never for an empty result).
///
/// [`complete`]: CompletionProvider::complete
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Adapter identifier used in logs and display lookups.
    fn name(&self) -> &str;

    /// The vendor model name this adapter instance is bound to.
    fn model(&self) -> &str;

    /// Non-streaming path: one request, one parse, full text.
    async fn fetch(&self, request: &CompletionRequest) -> Result<String, VellumError>;

    /// Streaming path: drives the vendor's incremental protocol to
    /// completion, forwarding fragments to `on_chunk`.
    async fn stream(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<(), VellumError>;

    /// Caller-facing entry point; see the trait docs for the rules.
    async fn complete(
        &self,
        request: &CompletionRequest,
        on_chunk: Option<ChunkHandler>,
    ) -> Result<Option<String>, VellumError> {
        request.validate()?;
        match on_chunk {
            Some(handler) if request.streaming => {
                self.stream(request, handler).await?;
                Ok(None)
            }
            handler => {
                let text = self.fetch(request).await?;
                if let Some(handler) = handler {
                    if !text.is_empty() {
                        handler(text.clone());
                    }
                }
                Ok(Some(text))
            }
        }
    }
}

impl std::fmt::Debug for dyn CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionProvider")
            .field("name", &self.name())
            .field("model", &self.model())
            .finish()
    }
}
