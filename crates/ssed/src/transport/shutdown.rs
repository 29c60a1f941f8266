//! Termination signal handling.

use std::io;

use thiserror::Error;
use tracing::info;

use super::TRANSPORT_TARGET;

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Resolves when the process receives SIGINT or SIGTERM.
///
/// Handlers are installed by [`install`](Self::install), which must run
/// inside a Tokio runtime, so a failure is reported before serving starts.
#[derive(Debug)]
pub struct SystemShutdownSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl SystemShutdownSignal {
    /// Installs the signal handlers.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when the runtime refuses a handler.
    #[cfg(unix)]
    pub fn install() -> Result<Self, ShutdownError> {
        use tokio::signal::unix::{SignalKind, signal};

        let install = |kind: SignalKind| signal(kind).map_err(|source| ShutdownError::Install { source });
        Ok(Self {
            interrupt: install(SignalKind::interrupt())?,
            terminate: install(SignalKind::terminate())?,
        })
    }

    /// Installs the signal handlers.
    ///
    /// # Errors
    ///
    /// Never fails on this platform; the Ctrl-C handler is installed lazily.
    #[cfg(not(unix))]
    pub fn install() -> Result<Self, ShutdownError> {
        Ok(Self {})
    }

    /// Waits for the first termination signal.
    #[cfg(unix)]
    pub async fn wait(mut self) {
        let signal = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        };
        info!(target: TRANSPORT_TARGET, signal, "shutdown signal received");
    }

    /// Waits for Ctrl-C.
    #[cfg(not(unix))]
    pub async fn wait(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!(target: TRANSPORT_TARGET, signal = "ctrl-c", "shutdown signal received"),
            Err(error) => tracing::warn!(
                target: TRANSPORT_TARGET,
                %error,
                "ctrl-c handler failed; shutting down"
            ),
        }
    }
}
