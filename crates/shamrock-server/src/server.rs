//! Listener setup and the serve loop.
//!
//! Binding and serving are separate steps: [`Server::bind`] claims the
//! port (so a busy port fails before any traffic is expected) and
//! [`Server::serve`] runs until `Ctrl-C`. Tests bind port 0 and stop the
//! server with [`Server::serve_until`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use shamrock_core::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// A bound API server that is not serving yet.
pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Bind `host:port` from `config`. Host names are resolved.
    pub async fn bind(config: &ServerConfig, state: Arc<AppState>) -> Result<Self, ServerError> {
        let endpoint = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(endpoint.as_str())
            .await
            .map_err(|source| ServerError::Bind {
                endpoint: endpoint.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { endpoint, source })?;
        Ok(Self {
            listener,
            router: build_router(state),
            local_addr,
        })
    }

    /// The address actually bound. Differs from the config when port 0
    /// was requested.
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `Ctrl-C`.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_until(ctrl_c()).await
    }

    /// Serve until `shutdown` completes, then drain open connections.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr;
        info!(%addr, "Help Ireland API listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;
        info!(%addr, "Help Ireland API stopped");
        Ok(())
    }
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}

/// Server startup and runtime failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured endpoint could not be bound.
    #[error("cannot listen on {endpoint}: {source}")]
    Bind {
        /// `host:port` as configured.
        endpoint: String,
        /// The socket error.
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("server stopped unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}
