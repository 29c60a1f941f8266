//! Mutual TLS configuration.

use sse_config::TlsPem;
use tonic::transport::{Certificate, Identity, ServerTlsConfig};

/// Builds a server TLS configuration that requires a client certificate
/// signed by the configured root.
#[must_use]
pub fn server_tls_config(pem: &TlsPem) -> ServerTlsConfig {
    ServerTlsConfig::new()
        .identity(Identity::from_pem(&pem.cert, &pem.key))
        .client_ca_root(Certificate::from_pem(&pem.root))
}
