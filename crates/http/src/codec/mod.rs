//! HTTP codec module for decoding requests and encoding responses
//!
//! Both halves plug into `tokio_util::codec` so the connection can drive them with
//! `FramedRead` and `FramedWrite`.
//!
//! - Request handling:
//!   - [`RequestDecoder`]: frames one request within a byte budget
//!   - Header parsing via [`HeaderDecoder`]
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: writes the header block and the body
//!   - Status line and headers via [`HeaderEncoder`]
//!
//! # Example
//!
//! ```
//! use shelf_http::codec::{RequestDecoder, ResponseEncoder};
//! use shelf_http::protocol::Response;
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = RequestDecoder::new().decode(&mut request_buffer).unwrap().unwrap();
//!
//! let mut response_buffer = BytesMut::new();
//! let response = Response::ok().with_version(request.version()).with_body("hi");
//! ResponseEncoder::new().encode(response, &mut response_buffer).unwrap();
//! assert_eq!(&response_buffer[..], b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
//! ```

mod header;
mod request_decoder;
mod response_encoder;

pub use header::{HeaderDecoder, HeaderEncoder};
pub use request_decoder::{DEFAULT_MAX_REQUEST_BYTES, RequestDecoder};
pub use response_encoder::ResponseEncoder;
