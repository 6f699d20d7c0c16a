use http::StatusCode;
use shelf_http::protocol::Response;
use shelf_http::protocol::header::{CONNECTION, CONTENT_TYPE};

use crate::RequestContext;

/// Empty 404, used when no route matches.
pub fn not_found(_req: RequestContext<'_>) -> Response {
    Response::not_found()
}

/// `201 Created` echoing the request body, sent for every accepted POST.
pub fn created(req: RequestContext<'_>) -> Response {
    Response::new(StatusCode::CREATED)
        .with_header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
        .with_header(CONNECTION, "close")
        .with_body(req.body().clone())
}
