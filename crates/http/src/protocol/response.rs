//! HTTP response type.
//!
//! Responses are built by chaining `with_*` calls. [`Response::with_body`] keeps the
//! `Content-Length` header in sync with the body so handlers cannot forget it.

use bytes::Bytes;
use http::{StatusCode, Version};

use crate::protocol::Headers;
use crate::protocol::header::CONTENT_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    version: Version,
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Creates an `HTTP/1.1` response with no headers and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self { version: Version::HTTP_11, status, headers: Headers::new(), body: Bytes::new() }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body and a matching `Content-Length`.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.headers.insert(CONTENT_LENGTH, self.body.len().to_string());
        self
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (Version, StatusCode, Headers, Bytes) {
        (self.version, self.status, self.headers, self.body)
    }
}
