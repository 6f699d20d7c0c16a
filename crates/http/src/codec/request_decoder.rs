//! HTTP request decoder module
//!
//! Frames exactly one request out of the connection's read buffer. Header parsing is
//! delegated to [`HeaderDecoder`]; once the header is known the body is cut from the
//! buffer according to its [`PayloadSize`].
//!
//! # Example
//!
//! ```
//! use shelf_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /echo/hi HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.path(), "/echo/hi");
//! ```

use crate::codec::header::HeaderDecoder;
use crate::protocol::{ParseError, PayloadSize, Request, RequestHeader};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::warn;

/// Default budget for one request, header and body together
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024;

/// A decoder for a single HTTP request, header and body
///
/// # State Machine
///
/// The decoder maintains its state through the `pending` field:
/// - `None`: Currently parsing headers
/// - `Some((header, payload_size))`: Header parsed, waiting for the body
#[derive(Debug)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    pending: Option<(RequestHeader, PayloadSize)>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` with the default 1024 byte budget
    pub fn new() -> Self {
        Self::with_max_request_bytes(DEFAULT_MAX_REQUEST_BYTES)
    }

    pub fn with_max_request_bytes(max_request_bytes: usize) -> Self {
        Self { header_decoder: HeaderDecoder::new(max_request_bytes), pending: None }
    }

    pub fn max_request_bytes(&self) -> usize {
        self.header_decoder.max_request_bytes()
    }

    /// Completes a request whose header already arrived, using the buffered bytes as
    /// a truncated body.
    ///
    /// Returns `None` while the header is still incomplete.
    pub fn flush_pending(&mut self, buf: &mut BytesMut) -> Option<Request> {
        let (_, payload_size) = self.pending.as_ref()?;
        warn!(expected = ?payload_size, received = buf.len(), "body did not arrive in full, truncating");
        let body = buf.split().freeze();
        self.finish(body)
    }

    fn finish(&mut self, body: Bytes) -> Option<Request> {
        self.pending.take().map(|(header, _)| header.body(body))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode an HTTP request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: header and body are complete
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let payload_size = match &self.pending {
            Some((_, payload_size)) => *payload_size,
            None => match self.header_decoder.decode(src)? {
                Some((header, payload_size)) => {
                    self.pending = Some((header, payload_size));
                    payload_size
                }
                None => return Ok(None),
            },
        };

        let body = match payload_size {
            PayloadSize::Empty => Bytes::new(),
            PayloadSize::Buffered(limit) => src.split_to(src.len().min(limit)).freeze(),
            PayloadSize::Length(length) if src.len() >= length => src.split_to(length).freeze(),
            PayloadSize::Length(_) => return Ok(None),
        };

        Ok(self.finish(body))
    }

    /// Called once the peer stopped sending.
    ///
    /// A body cut short by the peer is truncated to what arrived; a header cut short
    /// is an error.
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(buf)? {
            return Ok(Some(request));
        }

        if self.pending.is_some() {
            return Ok(self.flush_pending(buf));
        }

        if buf.is_empty() { Ok(None) } else { Err(ParseError::incomplete(buf.len())) }
    }
}
