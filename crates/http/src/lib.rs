//! A single-request HTTP/1.1 protocol layer
//!
//! This crate frames one request off a connection, parses it into a structured
//! [`protocol::Request`], hands it to a [`handler::Handler`] and serializes the
//! returned [`protocol::Response`] back onto the wire before closing the connection.
//! It is built on tokio and `tokio_util::codec`.
//!
//! # Example
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use shelf_http::connection::HttpConnection;
//! use shelf_http::handler::make_handler;
//! use shelf_http::protocol::{Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:4221").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             match connection.process(handler).await {
//!                 Ok(()) => info!("finished process, connection shutdown"),
//!                 Err(e) => error!("service has error, cause {}, connection shutdown", e),
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::ok().with_version(request.version()).with_body("Hello World!\r\n"))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: connection lifecycle, timeouts and error responses
//! - [`protocol`]: request, response and header types plus errors
//! - [`codec`]: request decoding and response encoding
//! - [`handler`]: the request handler trait
//!
//! # Limitations
//!
//! - One request per connection, no keep-alive or pipelining
//! - No chunked transfer encoding
//! - Request size (header and body) bounded, 1024 bytes by default
//! - Maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
