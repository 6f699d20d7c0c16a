//! HTTP header processing module for encoding and decoding headers
//!
//! - [`HeaderDecoder`]: Decodes HTTP request headers from raw bytes
//!   - Finds the `CRLF CRLF` delimiter within the request budget
//!   - Decides how much body follows
//!
//! - [`HeaderEncoder`]: Encodes HTTP response headers to bytes
//!   - Status line with canonical reason phrase
//!   - Header lines in insertion order

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
