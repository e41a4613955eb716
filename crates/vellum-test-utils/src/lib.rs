// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities: a scripted [`Transport`] with request capture and a
//! chunk collector, enabling fast, CI-runnable adapter tests without
//! external API calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use vellum_core::provider::ChunkHandler;
use vellum_core::transport::{ByteStream, HttpRequest, HttpResponse, Transport};
use vellum_core::VellumError;

/// One pre-scripted transport response.
pub struct CannedResponse {
    pub status: u16,
    pub status_text: String,
    /// Body frames delivered one per read. `None` scripts a response with
    /// no readable body at all.
    pub frames: Option<Vec<Vec<u8>>>,
}

impl CannedResponse {
    /// 200 response whose body is one JSON document.
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self {
            status: 200,
            status_text: "OK".into(),
            frames: Some(vec![value.to_string().into_bytes()]),
        }
    }

    /// 200 response delivering the given frames one read at a time.
    pub fn ok_frames(frames: &[&str]) -> Self {
        Self {
            status: 200,
            status_text: "OK".into(),
            frames: Some(frames.iter().map(|f| f.as_bytes().to_vec()).collect()),
        }
    }

    /// Non-success response with a plain body.
    pub fn error(status: u16, status_text: &str, body: &str) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            frames: Some(vec![body.as_bytes().to_vec()]),
        }
    }

    /// Response that exposes no readable body.
    pub fn bodyless(status: u16) -> Self {
        Self {
            status,
            status_text: "OK".into(),
            frames: None,
        }
    }

    fn into_response(self) -> HttpResponse {
        let body: Option<ByteStream> = self.frames.map(|frames| {
            Box::pin(futures::stream::iter(
                frames.into_iter().map(|f| Ok(Bytes::from(f))),
            )) as ByteStream
        });
        HttpResponse::new(self.status, self.status_text, body)
    }
}

/// Transport returning queued canned responses and recording every request
/// for later assertions (headers, bodies, urls).
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<CannedResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<CannedResponse>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: CannedResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The single recorded request; panics if there is not exactly one.
    pub fn only_request(&self) -> HttpRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, VellumError> {
        self.requests.lock().unwrap().push(request);
        let canned = self.responses.lock().unwrap().pop_front();
        match canned {
            Some(canned) => Ok(canned.into_response()),
            None => Err(VellumError::transport("scripted transport exhausted")),
        }
    }
}

/// Chunk handler that appends every fragment to a shared vector.
pub fn chunk_collector() -> (ChunkHandler, Arc<Mutex<Vec<String>>>) {
    let chunks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&chunks);
    let handler: ChunkHandler = Arc::new(move |fragment: String| {
        sink.lock().unwrap().push(fragment);
    });
    (handler, chunks)
}

/// Body of a recorded request parsed as JSON.
pub fn request_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().unwrap_or(b"null")).unwrap()
}

/// True when the request carries a header with the given (lowercased) name.
pub fn has_header(request: &HttpRequest, name: &str) -> bool {
    request
        .headers
        .iter()
        .any(|(n, _)| n.eq_ignore_ascii_case(name))
}
