//! Function dispatch for execution calls.
//!
//! Each `ExecuteFunction` call carries its function id in binary metadata.
//! The id is decoded once into a [`CallContext`], resolved against the
//! [`DispatchTable`] built at startup, and the matching handler runs in its
//! own task while holding a worker permit.

mod context;
mod errors;
mod service;
mod table;

pub use self::context::{CallContext, CommonRequest};
pub use self::errors::CallError;
pub use self::service::{ConnectorService, Dispatcher, ExecutionLimits};
pub use self::table::{DispatchBuildError, DispatchEntry, DispatchTable};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
