//! HTTP request types.
//!
//! A request is decoded in two steps: the header block becomes a [`RequestHeader`],
//! and once the body bytes are framed the header is turned into a full [`Request`]
//! with [`RequestHeader::body`].

use bytes::Bytes;
use http::{Method, Version};

use crate::protocol::{Headers, ParseError};

/// The start line and header fields of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    method: Method,
    path: String,
    version: Version,
    headers: Headers,
}

impl RequestHeader {
    pub fn new(method: Method, path: impl Into<String>, version: Version, headers: Headers) -> Self {
        Self { method, path: path.into(), version, headers }
    }

    /// Attaches a body to this header, converting it into a full [`Request`].
    pub fn body(self, body: Bytes) -> Request {
        Request { header: self, body }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw request-target, exactly as sent (no percent-decoding).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the declared body length, if the request carries a `Content-Length`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidContentLength`] when the value is not a
    /// non-negative integer.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        let Some(value) = self.headers.get_ignore_case(super::header::CONTENT_LENGTH) else {
            return Ok(None);
        };

        value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_e| ParseError::invalid_content_length(format!("value {value} is not usize")))
    }
}

/// Converts a completely parsed `httparse` request into a [`RequestHeader`].
///
/// Duplicate header names collapse to the last value. Header values are never
/// rejected for their bytes.
impl TryFrom<httparse::Request<'_, '_>> for RequestHeader {
    type Error = ParseError;

    fn try_from(req: httparse::Request<'_, '_>) -> Result<Self, Self::Error> {
        let method = req.method.ok_or(ParseError::InvalidMethod)?;
        let method = Method::from_bytes(method.as_bytes()).map_err(|_e| ParseError::InvalidMethod)?;
        let path = req.path.ok_or(ParseError::InvalidUri)?;
        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            v => return Err(ParseError::InvalidVersion(v)),
        };

        let mut headers = Headers::with_capacity(req.headers.len());
        for header in req.headers.iter() {
            // obs-text such as Latin-1 is accepted, invalid sequences become U+FFFD
            headers.insert(header.name, String::from_utf8_lossy(header.value));
        }

        Ok(Self::new(method, path, version, headers))
    }
}

/// A fully framed request: header plus the body bytes read for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    header: RequestHeader,
    body: Bytes,
}

impl Request {
    pub fn method(&self) -> &Method {
        self.header.method()
    }

    pub fn path(&self) -> &str {
        self.header.path()
    }

    pub fn version(&self) -> Version {
        self.header.version()
    }

    pub fn headers(&self) -> &Headers {
        self.header.headers()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestHeader, Bytes) {
        (self.header, self.body)
    }
}
