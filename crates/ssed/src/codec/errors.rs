//! Errors raised while decoding or emitting rows.

use thiserror::Error;

/// A single cell could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    /// The row is narrower than the requested column.
    #[error("column {column} is missing; the row has {width} cells")]
    MissingColumn {
        /// Requested column.
        column: usize,
        /// Actual row width.
        width: usize,
    },
    /// The cell carries neither a numeric nor a text part.
    #[error("column {column} has no {expected} value")]
    Empty {
        /// Offending column.
        column: usize,
        /// Requested representation.
        expected: &'static str,
    },
    /// Text could not be parsed as a number.
    #[error("column {column} holds '{text}', which is not numeric")]
    NotNumeric {
        /// Offending column.
        column: usize,
        /// Cell text.
        text: String,
    },
}

/// Errors raised by the row stream codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A cell in the input could not be extracted.
    #[error("row {row}: {source}")]
    Cell {
        /// Zero-based row index within the call.
        row: usize,
        /// Cell-level failure.
        #[source]
        source: CellError,
    },
    /// The inbound stream failed.
    #[error("inbound stream failed: {source}")]
    Transport {
        /// Status reported by the transport.
        #[source]
        source: tonic::Status,
    },
    /// The caller went away; no further rows will be read.
    #[error("the call was cancelled by the caller")]
    Cancelled,
}
