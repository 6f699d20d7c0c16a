//! The seam between a connection and the application.
//!
//! [`crate::connection::HttpConnection`] hands every framed [`Request`] to a
//! [`Handler`] and writes back whatever [`Response`] it produces. An `Err` from the
//! handler becomes a `500 Internal Server Error`.

use std::error::Error;
use std::future::Future;

use crate::protocol::{Request, Response};

#[trait_variant::make(Handler: Send)]
pub trait LocalHandler {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Request) -> Result<Response, Self::Error>;
}

/// Adapts an async function into a [`Handler`], see [`make_handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut, Err> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    type Error = Err;

    fn call(&self, req: Request) -> impl Future<Output = Result<Response, Self::Error>> + Send {
        (self.f)(req)
    }
}

pub fn make_handler<F, Fut, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future<Output = Result<Response, Err>>,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
