//! Server-side extension plugin serving player point predictions.
//!
//! The plugin speaks the `qlik.sse.Connector` gRPC protocol. At startup it
//! loads a JSON function manifest, pairs each declared function with a
//! handler, and serves two calls: capability negotiation, which advertises
//! the manifest, and function execution, which streams rows in and out.
//!
//! The bootstrap sequence loads configuration, initialises structured
//! telemetry, validates the manifest and TLS material, and builds the
//! dispatch table. Any failure is fatal. Once serving, failures are scoped
//! to the call that caused them and reported as gRPC statuses; the server
//! keeps running until SIGINT or SIGTERM, then drains in-flight calls.

mod bootstrap;
pub mod capabilities;
pub mod codec;
pub mod dispatch;
pub mod functions;
mod health;
pub mod proto;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Plugin, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
    bootstrap_with_backend,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
