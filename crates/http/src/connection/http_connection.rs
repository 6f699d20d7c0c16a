use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::codec::{DEFAULT_MAX_REQUEST_BYTES, RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request, Response};

use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

/// Limits applied to a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Budget for header and body of the one request
    pub max_request_bytes: usize,
    /// How long the peer has to deliver a complete request
    pub read_timeout: Duration,
    /// How long writing the response may take
    pub write_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// An HTTP connection that serves exactly one request.
///
/// `HttpConnection` reads and decodes one request, passes it to a [`Handler`],
/// writes the response and closes the write half. Failures only ever affect this
/// connection:
/// - a malformed request is answered with `400 Bad Request`
/// - a handler error is answered with `500 Internal Server Error`
/// - a read or write timeout closes the connection without a response
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
    config: ConnectionConfig,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: ConnectionConfig) -> Self {
        let decoder = RequestDecoder::with_max_request_bytes(config.max_request_bytes);
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, config.max_request_bytes),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            config,
        }
    }

    /// Serves one request, then shuts down the write half.
    ///
    /// # Errors
    ///
    /// Returns the decode, send or timeout error that ended the connection early.
    /// A peer that closes without sending anything is not an error.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + Sync,
    {
        let result = self.do_process(handler.as_ref()).await;

        if let Err(e) = self.framed_write.get_mut().shutdown().await {
            debug!(cause = %e, "failed to shutdown connection");
        }

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler + Sync,
    {
        let next = match timeout(self.config.read_timeout, self.framed_read.next()).await {
            Ok(next) => next,
            // header complete but body short: serve what arrived
            Err(_elapsed) => match self.take_pending_request() {
                Some(request) => Some(Ok(request)),
                None => return Err(HttpError::timeout("reading request")),
            },
        };

        let request = match next {
            Some(Ok(request)) => request,

            Some(Err(e @ ParseError::Io { .. })) => {
                error!(cause = %e, "can't read request");
                return Err(e.into());
            }

            Some(Err(e)) => {
                error!(cause = %e, "can't decode request");
                self.send_response(build_error_response(StatusCode::BAD_REQUEST)).await?;
                return Err(e.into());
            }

            None => {
                info!("peer closed before sending a request, connection shutdown");
                return Ok(());
            }
        };

        let version = request.version();
        debug!(method = %request.method(), path = request.path(), body_size = request.body().len(), "received request");

        let response = match handler.call(request).await {
            Ok(response) => response,
            Err(e) => {
                let cause: Box<dyn Error + Send + Sync> = e.into();
                error!(cause = %cause, "handle request error");
                build_error_response(StatusCode::INTERNAL_SERVER_ERROR).with_version(version)
            }
        };

        debug!(status = %response.status(), body_size = response.body().len(), "sending response");
        self.send_response(response).await
    }

    fn take_pending_request(&mut self) -> Option<Request> {
        let mut buffered = self.framed_read.read_buffer_mut().split();
        self.framed_read.decoder_mut().flush_pending(&mut buffered)
    }

    async fn send_response(&mut self, response: Response) -> Result<(), HttpError> {
        timeout(self.config.write_timeout, self.framed_write.send(response))
            .await
            .map_err(|_e| HttpError::timeout("writing response"))??;
        Ok(())
    }
}

fn build_error_response(status_code: StatusCode) -> Response {
    Response::new(status_code)
}
