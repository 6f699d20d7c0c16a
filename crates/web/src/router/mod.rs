//! Ordered method + path-pattern routing.
//!
//! Routes are tried in the order they were added and the first one whose method
//! matches exactly and whose [`PathPattern`] matches the request path wins.

use crate::handler::RequestHandler;
use http::Method;
use tracing::trace;

/// How a route matches the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// The whole path must be equal
    Exact(String),
    /// The path must start with the prefix; the rest becomes the tail
    Prefix(String),
    /// Every path matches; the tail is the whole path
    Any,
}

impl PathPattern {
    /// Returns the path tail if `path` matches this pattern
    pub fn matches<'req>(&self, path: &'req str) -> Option<&'req str> {
        match self {
            PathPattern::Exact(expected) => (path == expected).then_some(""),
            PathPattern::Prefix(prefix) => path.strip_prefix(prefix.as_str()),
            PathPattern::Any => Some(path),
        }
    }
}

pub fn exact(path: impl Into<String>) -> PathPattern {
    PathPattern::Exact(path.into())
}

pub fn prefix(prefix: impl Into<String>) -> PathPattern {
    PathPattern::Prefix(prefix.into())
}

pub fn any() -> PathPattern {
    PathPattern::Any
}

/// Main router structure that handles HTTP request routing
pub struct Router {
    items: Vec<RouterItem>,
}

/// A route: method, path pattern and the handler serving it
pub struct RouterItem {
    method: Method,
    pattern: PathPattern,
    handler: Box<dyn RequestHandler>,
}

/// Result of matching a route: the handler and the path tail
pub struct RouteResult<'router, 'req> {
    item: &'router RouterItem,
    tail: &'req str,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Finds the first route matching `method` and `path`
    pub fn at<'router, 'req>(&'router self, method: &Method, path: &'req str) -> Option<RouteResult<'router, 'req>> {
        let result = self
            .items
            .iter()
            .filter(|item| item.method == *method)
            .find_map(|item| item.pattern.matches(path).map(|tail| RouteResult { item, tail }));

        trace!(%method, path, matched = ?result.as_ref().map(|r| &r.item.pattern), "route lookup");
        result
    }

    /// Returns true if at least one route is registered for `method`
    pub fn serves_method(&self, method: &Method) -> bool {
        self.items.iter().any(|item| item.method == *method)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter().map(|item| (&item.method, &item.pattern))).finish()
    }
}

impl<'router, 'req> RouteResult<'router, 'req> {
    pub fn handler(&self) -> &'router dyn RequestHandler {
        self.item.handler.as_ref()
    }

    pub fn pattern(&self) -> &'router PathPattern {
        &self.item.pattern
    }

    pub fn tail(&self) -> &'req str {
        self.tail
    }
}

#[derive(Default)]
pub struct RouterBuilder {
    items: Vec<RouterItem>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: PathPattern, item_builder: RouterItemBuilder) -> Self {
        self.items.push(RouterItem { method: item_builder.method, pattern, handler: item_builder.handler });
        self
    }

    pub fn build(self) -> Router {
        Router { items: self.items }
    }
}

macro_rules! method_router {
    ($method:ident, $method_const:ident) => {
        pub fn $method<H: RequestHandler + 'static>(handler: H) -> RouterItemBuilder {
            RouterItemBuilder { method: Method::$method_const, handler: Box::new(handler) }
        }
    };
}

method_router!(get, GET);
method_router!(post, POST);

pub struct RouterItemBuilder {
    method: Method,
    handler: Box<dyn RequestHandler>,
}
