//! HTTP server loop serving dispatched mock responses.

use crate::dispatch::handler::handle_request;
use crate::dispatch::Dispatcher;
use crate::route::RouteStore;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),
    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// A bound mock server. Binding and serving are separate so callers can
/// learn the actual port (e.g. when binding port 0) before serving.
pub struct MockServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    dispatcher: Dispatcher,
}

impl MockServer {
    pub async fn bind(addr: SocketAddr, store: Arc<RouteStore>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e))?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        info!("Mock server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            dispatcher: Dispatcher::new(store),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> &Arc<RouteStore> {
        self.dispatcher.store()
    }

    /// Serve until the process exits.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Serve until `shutdown` resolves. The listener stops accepting at that
    /// point; connections already accepted run to completion on their own
    /// tasks.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let MockServer {
            listener,
            local_addr,
            dispatcher,
        } = self;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let dispatcher = dispatcher.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    handle_request(req, dispatcher.clone())
                                });
                                if let Err(e) = http1::Builder::new()
                                    .serve_connection(io, service)
                                    .await
                                {
                                    debug!("Connection error from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error on {}: {}", local_addr, e);
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Mock server on {} shutting down", local_addr);
                    break;
                }
            }
        }
    }
}
