//! The route table served by the `shelf` binary.

mod fallback;
mod files;
mod text;

use std::sync::Arc;

use crate::router::{Router, any, exact, get, post, prefix};
use crate::storage::Storage;
use crate::handler_fn;

pub use fallback::{created, not_found};
pub use files::{ReadFile, WriteFile};
pub use text::{echo, index, user_agent};

/// Builds the router. Routes are tried in the order listed here.
pub fn routes(storage: Arc<Storage>) -> Router {
    Router::builder()
        .route(prefix("/user-agent"), get(handler_fn(user_agent)))
        .route(prefix("/files/"), get(ReadFile::new(Arc::clone(&storage))))
        .route(prefix("/echo/"), get(handler_fn(echo)))
        .route(exact("/"), get(handler_fn(index)))
        .route(prefix("/files/"), post(WriteFile::new(storage)))
        .route(any(), post(handler_fn(created)))
        .build()
}
