//! Error types for listener operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use super::shutdown::ShutdownError;

/// Errors surfaced while binding or running the gRPC listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The bound address could not be queried.
    #[error("failed to read the bound listener address: {source}")]
    LocalAddr {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The TLS material was rejected.
    #[error("failed to configure TLS: {source}")]
    Tls {
        /// Transport error.
        #[source]
        source: tonic::transport::Error,
    },
    /// The server stopped with an error.
    #[error("gRPC server failed: {source}")]
    Serve {
        /// Transport error.
        #[source]
        source: tonic::transport::Error,
    },
    /// Shutdown signal handlers could not be installed.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}
