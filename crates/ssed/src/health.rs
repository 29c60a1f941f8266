//! Structured health reporting for plugin lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use sse_config::Config;

use crate::bootstrap::BootstrapError;
use crate::transport::ServerError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer for lifecycle events.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config, functions: usize);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once the listener is bound.
    fn listener_bound(&self, address: SocketAddr, secure: bool);

    /// Invoked when shutdown has been requested.
    fn server_stopping(&self, address: SocketAddr);

    /// Invoked after in-flight calls drained and the listener closed.
    fn server_stopped(&self, address: SocketAddr);

    /// Invoked when the server stops with an error.
    fn server_failed(&self, error: &ServerError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config, functions: usize) {
        (**self).bootstrap_succeeded(config, functions);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_bound(&self, address: SocketAddr, secure: bool) {
        (**self).listener_bound(address, secure);
    }

    fn server_stopping(&self, address: SocketAddr) {
        (**self).server_stopping(address);
    }

    fn server_stopped(&self, address: SocketAddr) {
        (**self).server_stopped(address);
    }

    fn server_failed(&self, error: &ServerError) {
        (**self).server_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting plugin bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config, functions: usize) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            port = config.port(),
            definition_file = %config.definition_file(),
            functions,
            workers = config.workers(),
            tls = config.tls_requested(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            "plugin bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "plugin bootstrap failed"
        );
    }

    fn listener_bound(&self, address: SocketAddr, secure: bool) {
        if !secure {
            tracing::warn!(
                target: HEALTH_TARGET,
                event = "insecure_listener",
                %address,
                "no TLS material configured; serving plaintext"
            );
        }
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_bound",
            %address,
            secure,
            "plugin listening"
        );
    }

    fn server_stopping(&self, address: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_stopping",
            %address,
            "draining in-flight calls"
        );
    }

    fn server_stopped(&self, address: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "server_stopped",
            %address,
            "plugin stopped"
        );
    }

    fn server_failed(&self, error: &ServerError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "server_failed",
            error = %error,
            error_debug = ?error,
            "plugin server failed"
        );
    }
}
