use shelf_http::protocol::Response;
use shelf_http::protocol::header::{CONTENT_TYPE, USER_AGENT};

use crate::RequestContext;

fn text(body: impl Into<bytes::Bytes>) -> Response {
    Response::ok().with_header(CONTENT_TYPE, mime::TEXT_PLAIN.as_ref()).with_body(body)
}

/// `GET /`
pub fn index(_req: RequestContext<'_>) -> Response {
    text(bytes::Bytes::new())
}

/// `GET /echo/<s>` answers with `<s>` as sent, without percent-decoding.
pub fn echo(req: RequestContext<'_>) -> Response {
    text(req.tail().to_owned())
}

/// `GET /user-agent` reflects the `User-Agent` header, matched case-sensitively.
pub fn user_agent(req: RequestContext<'_>) -> Response {
    match req.headers().get(USER_AGENT) {
        Some(agent) => text(agent.to_owned()),
        None => Response::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::request;
    use http::{Method, StatusCode};

    #[test]
    fn index_is_empty_text() {
        let req = request(Method::GET, "/", &[], b"");
        let response = index(RequestContext::new(&req, ""));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE), Some("text/plain"));
        assert_eq!(response.headers().get("Content-Length"), Some("0"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn echo_returns_raw_tail() {
        let req = request(Method::GET, "/echo/a%20b/c", &[], b"");
        let response = echo(RequestContext::new(&req, "a%20b/c"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"a%20b/c");
        assert_eq!(response.headers().get("Content-Length"), Some("7"));
    }

    #[test]
    fn user_agent_reflected() {
        let req = request(Method::GET, "/user-agent", &[("User-Agent", "curl/8.4.0")], b"");
        let response = user_agent(RequestContext::new(&req, ""));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"curl/8.4.0");
        assert_eq!(response.headers().get(CONTENT_TYPE), Some("text/plain"));
    }

    #[test]
    fn user_agent_name_is_case_sensitive() {
        let req = request(Method::GET, "/user-agent", &[("user-agent", "curl/8.4.0")], b"");
        let response = user_agent(RequestContext::new(&req, ""));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }
}
