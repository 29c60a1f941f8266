//! Errors raised while loading and validating a function manifest.
//!
//! Every variant is fatal at startup: a plugin must never advertise a partial
//! or ambiguous capability set. IO and parse failures are wrapped in `Arc` to
//! keep the error cheap to clone into health reports.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising from manifest loading or validation.
#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read function manifest '{path}': {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The manifest is not valid JSON or does not match the schema.
    #[error("malformed function manifest '{origin}': {source}")]
    Parse {
        /// File path, or `<inline>` for in-memory documents.
        origin: String,
        /// Underlying JSON error.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The manifest declares no functions.
    #[error("function manifest declares no functions")]
    Empty,

    /// Two entries share a function id.
    #[error("function id {id} is declared by both '{first}' and '{second}'")]
    DuplicateId {
        /// Shared identifier.
        id: u32,
        /// Name of the first declaration.
        first: String,
        /// Name of the conflicting declaration.
        second: String,
    },

    /// Two entries share a function name (case-insensitively).
    #[error("function name '{name}' is declared more than once")]
    DuplicateName {
        /// Conflicting name.
        name: String,
    },

    /// A function name is empty or whitespace.
    #[error("function {id} has an empty name")]
    BlankName {
        /// Identifier of the offending entry.
        id: u32,
    },

    /// A parameter name is empty or whitespace.
    #[error("function '{function}' declares a parameter with an empty name")]
    BlankParameter {
        /// Function declaring the parameter.
        function: String,
    },

    /// The id cannot be represented on the wire (signed 32-bit).
    #[error("function id {id} exceeds the protocol limit of {}", i32::MAX)]
    IdOutOfRange {
        /// Offending identifier.
        id: u32,
    },
}

/// Raised when a type field carries an unrecognised code or name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownTypeCode {
    kind: &'static str,
    value: String,
}

impl UnknownTypeCode {
    /// Creates an error for an unrecognised value of the named type family.
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Returns the offending value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}
