//! HTTP connection handling module
//!
//! - [`HttpConnection`]: drives one accepted connection from the first byte read to
//!   the final shutdown
//! - [`ConnectionConfig`]: request budget and read/write timeouts
//!
//! One request is served per connection; keep-alive and pipelining are not supported.

mod http_connection;

pub use http_connection::{ConnectionConfig, HttpConnection};
