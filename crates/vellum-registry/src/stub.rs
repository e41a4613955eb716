// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stand-in adapter used in testing mode when a provider has no
//! credential. Returns fixed placeholder text so UI flows can be exercised
//! offline; streaming paces the fragments with a short synthetic delay to
//! imitate network arrival.

use std::time::Duration;

use async_trait::async_trait;

use vellum_core::provider::{ChunkHandler, CompletionProvider};
use vellum_core::types::CompletionRequest;
use vellum_core::VellumError;

/// Placeholder fragments every stub completion is made of.
pub const STUB_FRAGMENTS: [&str; 3] = [
    "This is a stubbed completion ",
    "produced without contacting any vendor. ",
    "Configure an API key to get real output.",
];

/// Pause between streamed placeholder fragments.
const STUB_CHUNK_DELAY: Duration = Duration::from_millis(150);

pub struct StubProvider {
    name: String,
    model: String,
}

impl StubProvider {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn fetch(&self, request: &CompletionRequest) -> Result<String, VellumError> {
        request.validate()?;
        Ok(STUB_FRAGMENTS.concat())
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<(), VellumError> {
        request.validate()?;
        for fragment in STUB_FRAGMENTS {
            tokio::time::sleep(STUB_CHUNK_DELAY).await;
            on_chunk(fragment.to_string());
        }
        Ok(())
    }
}
