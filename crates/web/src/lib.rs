//! Application layer of the `shelf` server: routing, handlers, file storage and
//! configuration on top of [`shelf_http`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use shelf_web::{Server, Storage, handlers};
//!
//! # async fn run() -> std::io::Result<()> {
//! let storage = Arc::new(Storage::new(Some("/tmp/shelf".into())));
//! let server = Server::builder()
//!     .address("127.0.0.1:4221")
//!     .router(handlers::routes(storage))
//!     .build()
//!     .expect("router is set");
//! server.start().await
//! # }
//! ```

mod handler;
mod request;
mod server;

pub mod config;
pub mod handlers;
pub mod router;
pub mod storage;

pub use config::{Config, ConfigError};
pub use handler::{FnHandler, RequestHandler, handler_fn};
pub use request::RequestContext;
pub use router::Router;
pub use server::{Server, ServerBuildError, ServerBuilder};
pub use storage::{Storage, StorageError};
