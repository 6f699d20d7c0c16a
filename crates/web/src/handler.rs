use crate::RequestContext;
use async_trait::async_trait;
use shelf_http::protocol::Response;

/// A route handler.
///
/// Handlers never fail: every outcome, including I/O errors, is expressed as a
/// [`Response`] with an appropriate status.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: RequestContext<'_>) -> Response;
}

/// Adapts a plain synchronous function into a [`RequestHandler`]
#[derive(Debug)]
pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(RequestContext<'_>) -> Response + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> RequestHandler for FnHandler<F>
where
    F: Fn(RequestContext<'_>) -> Response + Send + Sync,
{
    async fn invoke(&self, req: RequestContext<'_>) -> Response {
        (self.f)(req)
    }
}
