//! Request context handed to route handlers.
//!
//! `RequestContext` borrows the framed request and carries the part of the path that
//! follows the matched route pattern (the "tail").

use bytes::Bytes;
use http::{Method, Version};
use shelf_http::protocol::{Headers, Request};

/// A matched request as seen by a [`crate::handler::RequestHandler`].
///
/// For a prefix route such as `/echo/` and the path `/echo/abc`, `tail()` is `abc`.
/// For an exact route the tail is empty; for a catch-all route it is the whole path.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'req> {
    request: &'req Request,
    tail: &'req str,
}

impl<'req> RequestContext<'req> {
    pub fn new(request: &'req Request, tail: &'req str) -> Self {
        Self { request, tail }
    }

    pub fn request(&self) -> &'req Request {
        self.request
    }

    pub fn method(&self) -> &'req Method {
        self.request.method()
    }

    pub fn path(&self) -> &'req str {
        self.request.path()
    }

    /// Returns the path remainder after the matched route pattern, undecoded
    pub fn tail(&self) -> &'req str {
        self.tail
    }

    pub fn version(&self) -> Version {
        self.request.version()
    }

    pub fn headers(&self) -> &'req Headers {
        self.request.headers()
    }

    pub fn body(&self) -> &'req Bytes {
        self.request.body()
    }
}
