//! HTTP header decoder: finds the end of the header block and parses it.
//!
//! This is the framing half of request decoding. The bytes up to and including the
//! first `CRLF CRLF` are parsed with `httparse` into a [`RequestHeader`] and removed
//! from the buffer; the bytes after it are left in place for the body.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - The whole request (header and body) must fit into `max_request_bytes`. A header
//!   block that does not end within that budget is rejected, a body that does not fit
//!   is truncated to what remains of it.

use bytes::{Buf, BytesMut};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::ensure;

use crate::protocol::{ParseError, PayloadSize, RequestHeader};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Decoder for HTTP request headers implementing the [`Decoder`] trait.
///
/// Yields the parsed [`RequestHeader`] together with the [`PayloadSize`] the body
/// decoder has to frame next.
#[derive(Debug, Clone, Copy)]
pub struct HeaderDecoder {
    max_request_bytes: usize,
}

impl HeaderDecoder {
    pub fn new(max_request_bytes: usize) -> Self {
        Self { max_request_bytes }
    }

    pub fn max_request_bytes(&self) -> usize {
        self.max_request_bytes
    }
}

impl Decoder for HeaderDecoder {
    type Item = (RequestHeader, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode HTTP headers from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((header, payload_size)))` if a complete header was parsed; the header
    ///   bytes have been consumed from `src`
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if parsing failed
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The start line is missing a method, path or version
    /// - A header line has no `:` separator or contains invalid characters
    /// - The number of headers exceeds `MAX_HEADER_NUM`
    /// - The header block does not end within `max_request_bytes`
    /// - `Content-Length` is not a number
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let parsed_result = req.parse(src.as_ref()).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            Error::Version => ParseError::InvalidVersion(None),
            e => ParseError::invalid_header(e.to_string()),
        });

        match parsed_result? {
            Status::Complete(body_offset) => {
                trace!(header_size = body_offset, "parsed request header");
                ensure!(
                    body_offset <= self.max_request_bytes,
                    ParseError::too_large_header(body_offset, self.max_request_bytes)
                );

                let header = RequestHeader::try_from(req)?;

                let budget = self.max_request_bytes - body_offset;
                let content_length = header.content_length()?;
                let (payload_size, truncated) = PayloadSize::clamp(content_length, budget);
                if truncated {
                    warn!(content_length = ?content_length, budget, "request body exceeds the request limit, truncating");
                }

                src.advance(body_offset);
                Ok(Some((header, payload_size)))
            }
            // If parsing incomplete, ensure the header can still end within the limit
            Status::Partial => {
                ensure!(src.len() < self.max_request_bytes, ParseError::too_large_header(src.len(), self.max_request_bytes));
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Version};
    use indoc::indoc;

    #[test]
    fn test_bytes_mut_lens() {
        let str = indoc! {r##"
        POST /files/notes HTTP/1.1
        Host: 127.0.0.1:4221
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let mut bytes = BytesMut::from(str);

        assert_eq!(bytes.len(), str.len());

        let mut header_decoder = HeaderDecoder::new(1024);

        let (_, payload_size) = header_decoder.decode(&mut bytes).unwrap().unwrap();

        assert_eq!(bytes.len(), 3);
        assert_eq!(&bytes[..], &b"123"[..]);
        assert_eq!(payload_size, PayloadSize::Buffered(1024 - (str.len() - 3)));
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /echo/abc HTTP/1.1
        Host: 127.0.0.1:4221
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let mut buf = BytesMut::from(str);

        let (header, _) = HeaderDecoder::new(1024).decode(&mut buf).unwrap().unwrap();

        assert!(buf.is_empty());
        assert_eq!(header.method(), &Method::GET);
        assert_eq!(header.version(), Version::HTTP_11);
        assert_eq!(header.path(), "/echo/abc");

        assert_eq!(header.headers().len(), 3);
        assert_eq!(header.headers().get("Accept"), Some("*/*"));
        assert_eq!(header.headers().get("Host"), Some("127.0.0.1:4221"));
        assert_eq!(header.headers().get("User-Agent"), Some("curl/7.79.1"));
    }

    #[test]
    fn latin1_header_value_is_accepted() {
        let mut buf = BytesMut::from(&b"GET /user-agent HTTP/1.1\r\nUser-Agent: caf\xe9\r\n\r\n"[..]);

        let (header, payload_size) = HeaderDecoder::new(1024).decode(&mut buf).unwrap().unwrap();

        assert!(buf.is_empty());
        assert_eq!(header.path(), "/user-agent");
        assert_eq!(header.headers().get("User-Agent"), Some("caf\u{FFFD}"));
        assert!(!payload_size.is_empty());
    }

    #[test]
    fn partial_header_needs_more() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost: local");

        assert!(HeaderDecoder::new(1024).decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 27);
    }

    #[test]
    fn missing_path_is_rejected() {
        let mut buf = BytesMut::from("GET HTTP/1.1\r\n\r\n");

        assert!(HeaderDecoder::new(1024).decode(&mut buf).is_err());
    }

    #[test]
    fn missing_separator_is_rejected() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost localhost\r\n\r\n");

        let result = HeaderDecoder::new(1024).decode(&mut buf);
        assert!(matches!(result, Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut buf = BytesMut::from("GET / HTTP/2.0\r\n\r\n");

        let result = HeaderDecoder::new(1024).decode(&mut buf);
        assert!(matches!(result, Err(ParseError::InvalidVersion(_))));
    }

    #[test]
    fn header_over_limit() {
        let mut buf = BytesMut::from(format!("GET / HTTP/1.1\r\nX-Pad: {}\r\n", "a".repeat(64)).as_str());

        let result = HeaderDecoder::new(32).decode(&mut buf);
        assert!(matches!(result, Err(ParseError::TooLargeHeader { max_size: 32, .. })));

        let mut buf = BytesMut::from(format!("GET / HTTP/1.1\r\nX-Pad: {}\r\n\r\n", "a".repeat(64)).as_str());

        let result = HeaderDecoder::new(32).decode(&mut buf);
        assert!(matches!(result, Err(ParseError::TooLargeHeader { max_size: 32, .. })));
    }

    #[test]
    fn content_length_is_clamped_to_budget() {
        let str = "POST /files/a HTTP/1.1\r\nContent-Length: 5000\r\n\r\n";
        let mut buf = BytesMut::from(str);

        let (_, payload_size) = HeaderDecoder::new(1024).decode(&mut buf).unwrap().unwrap();

        assert_eq!(payload_size, PayloadSize::Length(1024 - str.len()));
    }
}
