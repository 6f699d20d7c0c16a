use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use shelf_http::protocol::Response;
use shelf_http::protocol::header::{CONNECTION, CONTENT_TYPE};
use tracing::{debug, error, warn};

use crate::handler::RequestHandler;
use crate::handlers::fallback::created;
use crate::storage::Storage;
use crate::RequestContext;

/// `GET /files/<name>`: serves a file from storage, or an empty 404 on any failure.
#[derive(Debug, Clone)]
pub struct ReadFile {
    storage: Arc<Storage>,
}

impl ReadFile {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl RequestHandler for ReadFile {
    async fn invoke(&self, req: RequestContext<'_>) -> Response {
        match self.storage.read(req.tail()).await {
            Ok(contents) => Response::ok()
                .with_header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
                .with_header(CONNECTION, "close")
                .with_body(contents),
            Err(e) => {
                debug!(name = req.tail(), cause = %e, "can't read file");
                Response::not_found()
            }
        }
    }
}

/// `POST /files/<name>`: stores the request body, then answers like any other POST.
#[derive(Debug, Clone)]
pub struct WriteFile {
    storage: Arc<Storage>,
}

impl WriteFile {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl RequestHandler for WriteFile {
    async fn invoke(&self, req: RequestContext<'_>) -> Response {
        match self.storage.write(req.tail(), req.body()).await {
            Ok(()) => created(req),
            Err(e) if e.is_rejected_name() => {
                warn!(name = req.tail(), cause = %e, "rejected file name");
                Response::new(StatusCode::BAD_REQUEST)
            }
            Err(e) => {
                error!(name = req.tail(), cause = %e, "can't write file");
                Response::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::request;
    use crate::storage::tests::temp_dir;
    use http::Method;

    #[tokio::test]
    async fn write_then_read() {
        let dir = temp_dir("files");
        let storage = Arc::new(Storage::new(Some(dir.clone())));

        let post = request(Method::POST, "/files/data.bin", &[], b"\x01\x02hello");
        let response = WriteFile::new(Arc::clone(&storage)).invoke(RequestContext::new(&post, "data.bin")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().as_ref(), b"\x01\x02hello");

        let get = request(Method::GET, "/files/data.bin", &[], b"");
        let response = ReadFile::new(storage).invoke(RequestContext::new(&get, "data.bin")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"\x01\x02hello");
        assert_eq!(response.headers().get(CONTENT_TYPE), Some("application/octet-stream"));
        assert_eq!(response.headers().get("Content-Length"), Some("7"));
        assert_eq!(response.headers().get(CONNECTION), Some("close"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = temp_dir("files-missing");
        let read_file = ReadFile::new(Arc::new(Storage::new(Some(dir.clone()))));

        for name in ["missing.txt", "../etc/passwd", ""] {
            let get = request(Method::GET, "/files/", &[], b"");
            let response = read_file.invoke(RequestContext::new(&get, name)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{name:?}");
            assert!(response.headers().is_empty());
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn write_errors() {
        let dir = temp_dir("files-errors");
        let write_file = WriteFile::new(Arc::new(Storage::new(Some(dir.clone()))));
        let post = request(Method::POST, "/files/x", &[], b"x");

        let response = write_file.invoke(RequestContext::new(&post, "../escape")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = write_file.invoke(RequestContext::new(&post, "no/such/dir")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let no_root = WriteFile::new(Arc::new(Storage::default()));
        let response = no_root.invoke(RequestContext::new(&post, "x")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
