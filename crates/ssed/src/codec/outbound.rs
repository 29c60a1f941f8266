//! Paced emission of outbound rows.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Status;

use crate::proto::BundledRows;

use super::bundle::Bundler;
use super::cell::Row;
use super::errors::CodecError;

/// Response body handed to the transport.
pub type ResponseStream = ReceiverStream<Result<BundledRows, Status>>;

type Sender = mpsc::Sender<Result<BundledRows, Status>>;

/// Producer side of an execution call's response.
///
/// Rows are bundled and sent through a bounded channel. A full channel
/// suspends the producer until the transport drains it; a dropped receiver
/// surfaces as [`CodecError::Cancelled`].
#[derive(Debug)]
pub struct RowSink {
    sender: Sender,
    bundler: Bundler,
    rows_sent: usize,
    bundles_sent: usize,
}

impl RowSink {
    /// Creates a sink bundling `bundle_rows` rows and buffering at most
    /// `capacity` bundles, with the stream the transport reads from.
    #[must_use]
    pub fn channel(bundle_rows: usize, capacity: usize) -> (Self, ResponseStream) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let sink = Self {
            sender,
            bundler: Bundler::new(bundle_rows),
            rows_sent: 0,
            bundles_sent: 0,
        };
        (sink, ReceiverStream::new(receiver))
    }

    /// Queues a row, flushing a bundle when it fills up.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Cancelled`] when the caller has gone away.
    pub async fn send(&mut self, row: Row) -> Result<(), CodecError> {
        if self.is_cancelled() {
            return Err(CodecError::Cancelled);
        }
        self.rows_sent += 1;
        match self.bundler.push(row) {
            Some(bundle) => self.flush(bundle).await,
            None => Ok(()),
        }
    }

    /// Returns `true` once the caller stopped reading the response.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.sender.is_closed()
    }

    /// Handle able to report a terminal failure after the sink is gone.
    #[must_use]
    pub fn reporter(&self) -> FailureReporter {
        FailureReporter {
            sender: self.sender.clone(),
        }
    }

    /// Rows accepted so far.
    #[must_use]
    pub fn rows_sent(&self) -> usize {
        self.rows_sent
    }

    /// Flushes remaining rows and closes this producer.
    ///
    /// Returns the number of bundles sent over the sink's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Cancelled`] when the caller has gone away.
    pub async fn finish(mut self) -> Result<usize, CodecError> {
        if let Some(bundle) = self.bundler.finish() {
            self.flush(bundle).await?;
        }
        Ok(self.bundles_sent)
    }

    async fn flush(&mut self, bundle: BundledRows) -> Result<(), CodecError> {
        self.sender
            .send(Ok(bundle))
            .await
            .map_err(|_| CodecError::Cancelled)?;
        self.bundles_sent += 1;
        Ok(())
    }
}

/// Sends a terminal status on a call's response stream.
#[derive(Debug, Clone)]
pub struct FailureReporter {
    sender: Sender,
}

impl FailureReporter {
    /// Ends the response with `status`. Returns `false` when the caller has
    /// already gone away.
    pub async fn fail(&self, status: Status) -> bool {
        self.sender.send(Err(status)).await.is_ok()
    }
}
