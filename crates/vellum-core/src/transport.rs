// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Injected transport abstraction.
//!
//! Adapters never talk to a concrete HTTP client. The host injects a
//! [`Transport`] (native or sandboxed, selected by configuration) and the
//! adapters describe requests as plain data. Responses expose both a
//! one-shot JSON parse and an incremental byte stream, matching the two
//! decode paths of the completion contract.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::VellumError;

/// Incrementally readable response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, VellumError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A transport request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// POST request with a JSON body and `content-type` header.
    pub fn post_json(url: impl Into<String>, body: &impl Serialize) -> Result<Self, VellumError> {
        let body = serde_json::to_vec(body)
            .map_err(|e| VellumError::Internal(format!("failed to serialize request body: {e}")))?;
        Ok(Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: vec![("content-type".into(), "application/json".into())],
            body: Some(body),
        })
    }

    /// Adds one header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds an `Authorization: Bearer` header.
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {token}"))
    }
}

/// A transport response: status line plus an optional streaming body.
pub struct HttpResponse {
    status: u16,
    status_text: String,
    body: Option<ByteStream>,
}

impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: Option<ByteStream>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// True for 2xx statuses.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Takes the body for incremental decoding. `None` when the transport
    /// could not provide a readable stream.
    pub fn into_body(self) -> Option<ByteStream> {
        self.body
    }

    /// Drains the whole body into memory. A body-less response yields an
    /// empty buffer.
    pub async fn bytes(self) -> Result<Vec<u8>, VellumError> {
        let Some(mut body) = self.body else {
            return Ok(Vec::new());
        };
        let mut buffer = Vec::new();
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer)
    }

    /// Drains the body and parses it as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, VellumError> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| VellumError::Provider {
            message: format!("failed to parse vendor response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Fetch-like function injected by the host.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, VellumError>;
}

/// Builds the provider error for a non-success vendor response, embedding
/// the status code, reason text, and whatever body the vendor sent.
pub async fn vendor_failure(response: HttpResponse) -> VellumError {
    let status = response.status();
    let reason = response.status_text().to_string();
    let body = match response.bytes().await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    };
    VellumError::provider_status(status, &reason, &body)
}
