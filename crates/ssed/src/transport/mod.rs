//! gRPC listener for the plugin.
//!
//! The listener is bound eagerly so address conflicts surface before the
//! daemon reports itself ready. Serving stops when the supplied shutdown
//! future resolves; in-flight calls are allowed to finish.

mod errors;
mod server;
mod shutdown;
mod tls;

pub use self::errors::ServerError;
pub use self::server::SseServer;
pub use self::shutdown::{ShutdownError, SystemShutdownSignal};
pub use self::tls::server_tls_config;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
