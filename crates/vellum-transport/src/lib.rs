// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`Transport`] implementations.
//!
//! Two client builds sit behind the same trait: the native build (pooled,
//! system proxy honored) and the sandboxed build for restricted
//! environments (no proxy, no redirects). The host selects one via the
//! `use_alternate_transport` configuration flag; adapters only ever see
//! the trait.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use vellum_core::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use vellum_core::VellumError;

/// HTTP transport over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    label: &'static str,
}

impl HttpTransport {
    /// Default build: pooled connections, system proxy honored.
    pub fn native() -> Result<Self, VellumError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| VellumError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            label: "native",
        })
    }

    /// Alternate build for sandboxed environments: no proxy discovery and
    /// no redirect following.
    pub fn sandboxed() -> Result<Self, VellumError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| VellumError::Transport {
                message: format!("failed to build sandboxed HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            label: "sandboxed",
        })
    }

    /// Selects the transport build by the `use_alternate_transport` flag.
    pub fn from_flag(use_alternate_transport: bool) -> Result<Arc<dyn Transport>, VellumError> {
        let transport = if use_alternate_transport {
            Self::sandboxed()?
        } else {
            Self::native()?
        };
        Ok(Arc::new(transport))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, VellumError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        debug!(
            transport = self.label,
            method = %method,
            url = %request.url,
            "dispatching request"
        );

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| VellumError::Transport {
            message: format!("request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        let body = response.bytes_stream().map(|item| {
            item.map_err(|e| VellumError::Transport {
                message: format!("body read failed: {e}"),
                source: Some(Box::new(e)),
            })
        });

        Ok(HttpResponse::new(
            status.as_u16(),
            status_text,
            Some(Box::pin(body)),
        ))
    }
}
