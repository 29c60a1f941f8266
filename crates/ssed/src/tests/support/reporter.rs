//! Test double for [`HealthReporter`] that records lifecycle events.

use std::net::SocketAddr;
use std::sync::Mutex;

use sse_config::Config;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::transport::ServerError;

/// Lifecycle events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded { functions: usize },
    BootstrapFailed(String),
    ListenerBound { secure: bool },
    ServerStopping,
    ServerStopped,
    ServerFailed(String),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config, functions: usize) {
        self.record(HealthEvent::BootstrapSucceeded { functions });
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn listener_bound(&self, _address: SocketAddr, secure: bool) {
        self.record(HealthEvent::ListenerBound { secure });
    }

    fn server_stopping(&self, _address: SocketAddr) {
        self.record(HealthEvent::ServerStopping);
    }

    fn server_stopped(&self, _address: SocketAddr) {
        self.record(HealthEvent::ServerStopped);
    }

    fn server_failed(&self, error: &ServerError) {
        self.record(HealthEvent::ServerFailed(error.to_string()));
    }
}
