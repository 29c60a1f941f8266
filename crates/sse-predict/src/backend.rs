//! The seam between function handlers and the remote model.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::features::{FeatureSet, Prediction};

/// Evaluates a feature vector against a trained model.
///
/// Implementations must be shareable across concurrent calls; the daemon
/// holds a single instance behind an `Arc` for its whole lifetime.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Predicts a value, with the model's confidence, for `features`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the service is unreachable, rejects the
    /// request, or answers with something other than a prediction.
    async fn predict(&self, features: &FeatureSet) -> Result<Prediction, BackendError>;
}
