//! Function handlers and the catalogue that constructs them.
//!
//! A handler consumes the call's input rows lazily and pushes its output
//! rows into a sink. Handlers hold no per-call state; one instance serves
//! every call to its function.

mod catalogue;
mod features;
mod predict;

use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use sse_predict::PredictionBackend;

use crate::codec::{InboundRows, RowSink};
use crate::dispatch::{CallContext, CallError};

pub use self::catalogue::HandlerCatalogue;
pub use self::features::{FeatureError, FeatureStore, OBSERVED_FEATURE, PlayerFeatures};
pub use self::predict::{
    KNOWN_PLAYERS, NOT_POSSIBLE_TO_PREDICT, PREDICT_FUNCTION, PredictHandler, PredictOutcome,
};

/// Whether the host may cache a function's results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Host-side caching stays enabled.
    #[default]
    Allow,
    /// The response carries `qlik-cache: no-store`.
    NoStore,
}

/// Implementation of one manifest function.
#[async_trait]
pub trait FunctionHandler: Send + Sync {
    /// Runs one call, reading from `input` and writing to `output`.
    ///
    /// The caller flushes `output` after this returns successfully.
    ///
    /// # Errors
    ///
    /// Returns [`CallError`] when the input cannot be decoded or the caller
    /// cancels. Domain-level rejections should be expressed as output rows.
    async fn execute(
        &self,
        call: &CallContext,
        input: &mut InboundRows,
        output: &mut RowSink,
    ) -> Result<(), CallError>;

    /// Cache directive sent with every response of this function.
    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::Allow
    }
}

/// Shared collaborators handed to handler constructors.
#[derive(Clone)]
pub struct HandlerDeps {
    /// Prediction service adapter.
    pub backend: Arc<dyn PredictionBackend>,
    /// Directory holding per-player feature files.
    pub feature_dir: Utf8PathBuf,
}

impl std::fmt::Debug for HandlerDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerDeps")
            .field("feature_dir", &self.feature_dir)
            .finish_non_exhaustive()
    }
}
