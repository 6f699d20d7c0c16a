use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::{DEFAULT_LISTEN, DEFAULT_MAX_CONNECTIONS};
use crate::handler::RequestHandler;
use crate::handlers::not_found;
use crate::router::Router;
use crate::{RequestContext, handler_fn};
use shelf_http::connection::{ConnectionConfig, HttpConnection};
use shelf_http::handler::Handler;
use shelf_http::protocol::{Request, Response};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{Instrument, debug, error, info, info_span, warn};

pub struct ServerBuilder {
    router: Option<Router>,
    default_handler: Option<Box<dyn RequestHandler>>,
    address: String,
    max_connections: usize,
    connection_config: ConnectionConfig,
}

impl ServerBuilder {
    fn new() -> Self {
        Self {
            router: None,
            default_handler: None,
            address: DEFAULT_LISTEN.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_config: ConnectionConfig::default(),
        }
    }

    /// Address used by [`Server::start`], defaults to `0.0.0.0:4221`
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Handler for requests no route matches, defaults to an empty 404
    #[must_use]
    pub fn default_handler(mut self, request_handler: impl RequestHandler + 'static) -> Self {
        self.default_handler = Some(Box::new(request_handler));
        self
    }

    #[must_use]
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    #[must_use]
    pub fn connection_config(mut self, connection_config: ConnectionConfig) -> Self {
        self.connection_config = connection_config;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        if self.max_connections == 0 || self.max_connections > Semaphore::MAX_PERMITS {
            return Err(ServerBuildError::InvalidMaxConnections(self.max_connections));
        }

        let default_handler = self.default_handler.unwrap_or_else(|| Box::new(handler_fn(not_found)));
        Ok(Server {
            router,
            default_handler,
            address: self.address,
            max_connections: self.max_connections,
            connection_config: self.connection_config,
        })
    }
}

/// Accepts connections and serves one request on each.
///
/// At most `max_connections` connections are served at once. A permit is taken
/// before `accept`, so connections beyond the limit wait in the listen backlog.
pub struct Server {
    router: Router,
    default_handler: Box<dyn RequestHandler>,
    address: String,
    max_connections: usize,
    connection_config: ConnectionConfig,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("max connections must be between 1 and {max}, got {0}", max = Semaphore::MAX_PERMITS)]
    InvalidMaxConnections(usize),
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Binds the configured address and serves until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns the bind error. Errors on single connections are only logged.
    pub async fn start(self) -> io::Result<()> {
        let tcp_listener = TcpListener::bind(self.address.as_str()).await.inspect_err(|e| {
            error!(address = %self.address, cause = %e, "bind server error");
        })?;

        self.serve(tcp_listener, shutdown_signal()).await;
        Ok(())
    }

    /// Runs the accept loop on `tcp_listener` until `shutdown` completes.
    ///
    /// Connections already accepted keep running after the loop stops.
    pub async fn serve<F>(self, tcp_listener: TcpListener, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let local_addr = tcp_listener.local_addr().ok();
        info!(address = ?local_addr, max_connections = self.max_connections, "start listening");

        let connection_config = self.connection_config;
        let connection_limit = Arc::new(Semaphore::new(self.max_connections));
        let handler = Arc::new(self);
        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested, stop accepting");
                    break;
                }
                accepted = accept(&tcp_listener, &connection_limit) => accepted,
            };

            let (permit, tcp_stream, peer) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);
            tokio::spawn(
                async move {
                    let _permit = permit;
                    let (reader, writer) = tcp_stream.into_split();
                    let connection = HttpConnection::with_config(reader, writer, connection_config);
                    match connection.process(handler).await {
                        Ok(()) => debug!("finished process, connection shutdown"),
                        Err(e) => warn!(cause = %e, "connection closed with error"),
                    }
                }
                .instrument(info_span!("connection", %peer)),
            );
        }
    }
}

async fn accept(
    tcp_listener: &TcpListener,
    connection_limit: &Arc<Semaphore>,
) -> io::Result<(OwnedSemaphorePermit, TcpStream, SocketAddr)> {
    let permit = Arc::clone(connection_limit).acquire_owned().await.map_err(io::Error::other)?;
    let (tcp_stream, peer) = tcp_listener.accept().await?;
    debug!(%peer, available_permits = connection_limit.available_permits(), "connection accepted");
    Ok((permit, tcp_stream, peer))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "can't listen for ctrl-c, serving until killed");
        std::future::pending::<()>().await;
    }
}

impl Handler for Server {
    type Error = Infallible;

    async fn call(&self, req: Request) -> Result<Response, Self::Error> {
        let response = match self.router.at(req.method(), req.path()) {
            Some(route) => route.handler().invoke(RequestContext::new(&req, route.tail())).await,
            None => self.default_handler.invoke(RequestContext::new(&req, req.path())).await,
        };

        // methods without any route are answered as HTTP/1.1
        let response = if self.router.serves_method(req.method()) {
            response.with_version(req.version())
        } else {
            response
        };

        debug!(method = %req.method(), path = req.path(), status = response.status().as_u16(), "request served");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::routes;
    use crate::storage::Storage;
    use bytes::Bytes;
    use http::{Method, StatusCode, Version};
    use shelf_http::protocol::{Headers, RequestHeader};

    fn server() -> Server {
        Server::builder().router(routes(Arc::new(Storage::default()))).build().unwrap()
    }

    fn request(method: Method, path: &str, version: Version) -> Request {
        RequestHeader::new(method, path, version, Headers::new()).body(Bytes::new())
    }

    #[test]
    fn build_errors() {
        assert!(matches!(Server::builder().build(), Err(ServerBuildError::MissingRouter)));

        let result = Server::builder().router(Router::builder().build()).max_connections(0).build();
        assert!(matches!(result, Err(ServerBuildError::InvalidMaxConnections(0))));
    }

    #[tokio::test]
    async fn routed_request_keeps_version() {
        let response = server().call(request(Method::GET, "/echo/hi", Version::HTTP_10)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.version(), Version::HTTP_10);
        assert_eq!(response.body().as_ref(), b"hi");
    }

    #[tokio::test]
    async fn unmatched_path_is_not_found() {
        let response = server().call(request(Method::GET, "/nowhere", Version::HTTP_10)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.version(), Version::HTTP_10);
        assert!(response.headers().is_empty());
    }

    #[tokio::test]
    async fn other_methods_are_not_found_as_http_11() {
        for method in [Method::PUT, Method::DELETE, Method::HEAD] {
            let response = server().call(request(method, "/echo/hi", Version::HTTP_10)).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(response.version(), Version::HTTP_11);
            assert!(response.body().is_empty());
        }
    }

    #[tokio::test]
    async fn any_post_is_created() {
        let req = RequestHeader::new(Method::POST, "/submit", Version::HTTP_11, Headers::new()).body(Bytes::from("abc"));
        let response = server().call(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().as_ref(), b"abc");
    }
}
