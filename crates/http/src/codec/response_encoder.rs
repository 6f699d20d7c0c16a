use crate::codec::header::HeaderEncoder;
use crate::protocol::header::CONTENT_LENGTH;
use crate::protocol::{Response, SendError};
use bytes::BytesMut;
use tokio_util::codec::Encoder;

/// Serializes a whole [`Response`]: header block followed by the raw body.
///
/// A non-empty body without `Content-Length` gets one added before encoding.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, mut item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if !item.body().is_empty() && !item.headers().contains(CONTENT_LENGTH) {
            let length = item.body().len().to_string();
            item.headers_mut().insert(CONTENT_LENGTH, length);
        }

        self.header_encoder.encode(&item, dst)?;
        dst.extend_from_slice(item.body());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Headers;
    use http::StatusCode;

    fn encode(response: Response) -> BytesMut {
        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();
        dst
    }

    #[test]
    fn echo_response() {
        let response = Response::ok().with_header("Content-Type", "text/plain").with_body("abc");

        assert_eq!(&encode(response)[..], b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc");
    }

    #[test]
    fn bare_not_found() {
        assert_eq!(&encode(Response::not_found())[..], b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[test]
    fn missing_content_length_is_added() {
        let mut response = Response::ok().with_body("payload");
        response.headers_mut().remove(CONTENT_LENGTH);

        assert_eq!(&encode(response)[..], b"HTTP/1.1 200 OK\r\nContent-Length: 7\r\n\r\npayload");
    }

    #[test]
    fn reparse_recovers_headers_and_body() {
        let body: &[u8] = b"\x00\x01binary\r\n\r\nstill body";
        let response = Response::new(StatusCode::CREATED)
            .with_header("Content-Type", "application/octet-stream")
            .with_header("Connection", "close")
            .with_header("X-Custom", "a: b")
            .with_body(body);
        let expected_headers = response.headers().clone();

        let bytes = encode(response);

        let mut parsed = [httparse::EMPTY_HEADER; 16];
        let mut reparsed = httparse::Response::new(&mut parsed);
        let httparse::Status::Complete(body_offset) = reparsed.parse(&bytes).unwrap() else {
            panic!("response header should be complete");
        };

        let headers: Headers =
            reparsed.headers.iter().map(|h| (h.name, std::str::from_utf8(h.value).unwrap())).collect();

        assert_eq!(reparsed.code, Some(201));
        assert_eq!(reparsed.reason, Some("Created"));
        assert_eq!(headers, expected_headers);
        assert_eq!(&bytes[body_offset..], body);
    }
}
