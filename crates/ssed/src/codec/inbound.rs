//! Lazy decoding of the inbound bundle stream.

use std::fmt;
use std::pin::Pin;

use tokio_stream::{Stream, StreamExt};
use tonic::{Code, Status};

use crate::proto::{self, BundledRows};

use super::cell::Row;
use super::errors::{CellError, CodecError};

/// Boxed stream of inbound bundles as delivered by the transport.
pub type WireStream = Pin<Box<dyn Stream<Item = Result<BundledRows, Status>> + Send>>;

/// Row-at-a-time view over an inbound bundle stream.
///
/// Only the bundle currently being read is held in memory; the next one is
/// awaited when its predecessor is exhausted.
pub struct InboundRows {
    source: WireStream,
    current: std::vec::IntoIter<proto::Row>,
    rows_read: usize,
    bundles_read: usize,
    exhausted: bool,
}

impl InboundRows {
    /// Wraps a stream of bundles.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<BundledRows, Status>> + Send + 'static,
    {
        Self {
            source: Box::pin(stream),
            current: Vec::new().into_iter(),
            rows_read: 0,
            bundles_read: 0,
            exhausted: false,
        }
    }

    /// Wraps an in-memory list of bundles.
    #[must_use]
    pub fn from_bundles(bundles: Vec<BundledRows>) -> Self {
        Self::new(tokio_stream::iter(bundles.into_iter().map(Ok)))
    }

    /// Returns the next row in arrival order, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Cancelled`] when the caller cancelled the call
    /// and [`CodecError::Transport`] for any other stream failure. Both end
    /// the sequence.
    pub async fn next_row(&mut self) -> Result<Option<Row>, CodecError> {
        loop {
            if let Some(row) = self.current.next() {
                self.rows_read += 1;
                return Ok(Some(Row::from_wire(row)));
            }
            if self.exhausted {
                return Ok(None);
            }
            match self.source.next().await {
                Some(Ok(bundle)) => {
                    self.bundles_read += 1;
                    self.current = bundle.rows.into_iter();
                }
                Some(Err(status)) => {
                    self.exhausted = true;
                    return Err(if status.code() == Code::Cancelled {
                        CodecError::Cancelled
                    } else {
                        CodecError::Transport { source: status }
                    });
                }
                None => self.exhausted = true,
            }
        }
    }

    /// Rows returned so far.
    #[must_use]
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Bundles pulled from the transport so far.
    #[must_use]
    pub fn bundles_read(&self) -> usize {
        self.bundles_read
    }

    /// Attaches the index of the most recently returned row to a cell error.
    #[must_use]
    pub fn locate(&self, source: CellError) -> CodecError {
        CodecError::Cell {
            row: self.rows_read.saturating_sub(1),
            source,
        }
    }
}

impl fmt::Debug for InboundRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundRows")
            .field("rows_read", &self.rows_read)
            .field("bundles_read", &self.bundles_read)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}
