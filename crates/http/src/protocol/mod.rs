//! Core HTTP protocol types.
//!
//! - **Headers** ([`header`]): [`Headers`], the case-sensitive, last-write-wins header
//!   map, plus the header names the server produces
//! - **Request** ([`request`]): [`RequestHeader`] and the framed [`Request`]
//! - **Response** ([`response`]): [`Response`] with its `with_*` builder methods
//! - **Payload** ([`payload`]): [`PayloadSize`], the body framing decision
//! - **Errors** ([`error`]): [`HttpError`], [`ParseError`], [`SendError`]
//!
//! Everything here is owned and fully buffered: a connection serves exactly one
//! request whose size is bounded by the decoder, so there is no body streaming.

pub mod header;
pub use header::Headers;

mod payload;
pub use payload::PayloadSize;

mod request;
pub use request::Request;
pub use request::RequestHeader;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
