//! Bound gRPC listener and its serve loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use sse_config::TlsPem;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::dispatch::ConnectorService;
use crate::health::HealthReporter;
use crate::proto::connector_server::ConnectorServer;

use super::errors::ServerError;
use super::tls::server_tls_config;

/// A bound listener ready to serve the connector service.
pub struct SseServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    builder: Server,
    secure: bool,
    service: ConnectorService,
    reporter: Arc<dyn HealthReporter>,
}

impl SseServer {
    /// Binds `addr`, selecting mutual TLS when `tls` is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Tls`] when the PEM material is rejected and
    /// [`ServerError::Bind`] when the address cannot be bound.
    pub async fn bind(
        addr: SocketAddr,
        tls: Option<&TlsPem>,
        service: ConnectorService,
        reporter: Arc<dyn HealthReporter>,
    ) -> Result<Self, ServerError> {
        let mut builder = Server::builder();
        if let Some(pem) = tls {
            builder = builder
                .tls_config(server_tls_config(pem))
                .map_err(|source| ServerError::Tls { source })?;
        }
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::LocalAddr { source })?;
        let secure = tls.is_some();
        reporter.listener_bound(local_addr, secure);
        Ok(Self {
            listener,
            local_addr,
            builder,
            secure,
            service,
            reporter,
        })
    }

    /// Address actually bound, useful when port 0 was requested.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns `true` when TLS is enabled.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Serves until `shutdown` resolves, then drains in-flight calls.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] when the transport fails.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let Self {
            listener,
            local_addr,
            mut builder,
            service,
            reporter,
            ..
        } = self;

        let signal = {
            let reporter = Arc::clone(&reporter);
            async move {
                shutdown.await;
                reporter.server_stopping(local_addr);
            }
        };
        let result = builder
            .add_service(ConnectorServer::new(service))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
            .await
            .map_err(|source| ServerError::Serve { source });

        match &result {
            Ok(()) => reporter.server_stopped(local_addr),
            Err(error) => reporter.server_failed(error),
        }
        result
    }
}

impl std::fmt::Debug for SseServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseServer")
            .field("local_addr", &self.local_addr)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}
