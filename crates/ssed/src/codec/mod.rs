//! Conversion between wire bundles and in-process rows.
//!
//! Inbound, a stream of [`BundledRows`](crate::proto::BundledRows) becomes a
//! lazy row sequence ([`InboundRows`]) that pulls one bundle at a time.
//! Outbound, rows pushed into a [`RowSink`] are packed by a [`Bundler`] and
//! flushed through a bounded channel so production is paced by the
//! transport.

mod bundle;
mod cell;
mod errors;
mod inbound;
mod outbound;

pub use self::bundle::Bundler;
pub use self::cell::{Cell, Row};
pub use self::errors::{CellError, CodecError};
pub use self::inbound::{InboundRows, WireStream};
pub use self::outbound::{FailureReporter, ResponseStream, RowSink};
