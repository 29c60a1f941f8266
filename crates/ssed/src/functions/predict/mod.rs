//! Points-per-game prediction for a selected player.
//!
//! The function takes exactly one player name. Known players have their
//! stored features sent to the prediction service; anything else, and any
//! failure on the way, yields a single sentinel row.


use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sse_predict::{BackendError, Prediction, PredictionBackend};
use tracing::{info, warn};

use crate::codec::{Cell, CellError, InboundRows, Row, RowSink};
use crate::dispatch::{CallContext, CallError};

use super::FunctionHandler;
use super::features::{FeatureError, FeatureStore};

const PREDICT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::functions::predict");

/// Manifest name of the prediction function.
pub const PREDICT_FUNCTION: &str = "Predict";

/// Text returned whenever no prediction can be made.
pub const NOT_POSSIBLE_TO_PREDICT: &str = "Not possible to predict.";

/// Players with stored feature vectors.
pub const KNOWN_PLAYERS: [&str; 7] = [
    "Kevin Durant",
    "Allen Iverson",
    "Carmelo Anthony",
    "Isaiah Thomas",
    "Cory Jefferson",
    "Robbie Hummel",
    "Wesley Johnson",
];

/// How a prediction call ended.
///
/// Every variant other than [`Predicted`](Self::Predicted) renders as the
/// same sentinel text; the variants stay distinct for logging and tests.
#[derive(Debug)]
pub enum PredictOutcome {
    /// The service produced a prediction.
    Predicted {
        /// Selected player.
        player: String,
        /// Service output.
        prediction: Prediction,
        /// Value actually observed for the player.
        observed: Value,
    },
    /// No value arrived.
    NoSelection,
    /// More than one value arrived.
    AmbiguousSelection {
        /// Values received.
        count: usize,
    },
    /// The value is not a known player.
    UnknownPlayer {
        /// Value received.
        name: String,
    },
    /// The player's features could not be loaded.
    FeaturesUnavailable {
        /// Selected player.
        player: String,
        /// Load failure.
        error: FeatureError,
    },
    /// The prediction service failed.
    BackendFailed {
        /// Selected player.
        player: String,
        /// Service failure.
        error: BackendError,
    },
}

impl PredictOutcome {
    /// Stable label for structured logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Predicted { .. } => "predicted",
            Self::NoSelection => "no_selection",
            Self::AmbiguousSelection { .. } => "ambiguous_selection",
            Self::UnknownPlayer { .. } => "unknown_player",
            Self::FeaturesUnavailable { .. } => "features_unavailable",
            Self::BackendFailed { .. } => "backend_failed",
        }
    }

    /// Text sent back to the host.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Predicted {
                prediction,
                observed,
                ..
            } => format!(
                "Predicted number of PPG: {:.1} <br> Correct number of PPG: {} <br> Confidence: {:.2}",
                prediction.value(),
                render_observed(observed),
                prediction.confidence()
            ),
            _ => String::from(NOT_POSSIBLE_TO_PREDICT),
        }
    }

    fn log(&self, function_id: u32) {
        match self {
            Self::Predicted {
                player, prediction, ..
            } => info!(
                target: PREDICT_TARGET,
                function_id,
                reason = self.reason(),
                player = %player,
                value = prediction.value(),
                confidence = prediction.confidence(),
                "prediction produced"
            ),
            Self::BackendFailed { player, error } => warn!(
                target: PREDICT_TARGET,
                function_id,
                reason = self.reason(),
                backend_reason = error.reason(),
                player = %player,
                %error,
                "prediction service failed; returning sentinel"
            ),
            Self::FeaturesUnavailable { player, error } => warn!(
                target: PREDICT_TARGET,
                function_id,
                reason = self.reason(),
                player = %player,
                %error,
                "player features unavailable; returning sentinel"
            ),
            Self::NoSelection | Self::AmbiguousSelection { .. } | Self::UnknownPlayer { .. } => {
                info!(
                    target: PREDICT_TARGET,
                    function_id,
                    reason = self.reason(),
                    "selection cannot be predicted; returning sentinel"
                );
            }
        }
    }
}

fn render_observed(observed: &Value) -> String {
    match observed {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Handler for [`PREDICT_FUNCTION`].
#[derive(Clone)]
pub struct PredictHandler {
    backend: Arc<dyn PredictionBackend>,
    features: FeatureStore,
}

impl PredictHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(backend: Arc<dyn PredictionBackend>, features: FeatureStore) -> Self {
        Self { backend, features }
    }

    /// Decides the outcome for the first value of a call that received
    /// `count` values.
    pub async fn evaluate(&self, first: Option<&str>, count: usize) -> PredictOutcome {
        let Some(selected) = first else {
            return PredictOutcome::NoSelection;
        };
        if count > 1 {
            return PredictOutcome::AmbiguousSelection { count };
        }
        let player = selected.trim();
        if !KNOWN_PLAYERS.contains(&player) {
            return PredictOutcome::UnknownPlayer {
                name: selected.to_owned(),
            };
        }

        let loaded = match self.features.load(player).await {
            Ok(loaded) => loaded,
            Err(error) => {
                return PredictOutcome::FeaturesUnavailable {
                    player: player.to_owned(),
                    error,
                };
            }
        };
        match self.backend.predict(&loaded.features).await {
            Ok(prediction) => PredictOutcome::Predicted {
                player: player.to_owned(),
                prediction,
                observed: loaded.observed,
            },
            Err(error) => PredictOutcome::BackendFailed {
                player: player.to_owned(),
                error,
            },
        }
    }
}

impl std::fmt::Debug for PredictHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictHandler")
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FunctionHandler for PredictHandler {
    async fn execute(
        &self,
        call: &CallContext,
        input: &mut InboundRows,
        output: &mut RowSink,
    ) -> Result<(), CallError> {
        let mut first: Option<String> = None;
        let mut count = 0_usize;
        while let Some(row) = input.next_row().await? {
            if output.is_cancelled() {
                return Err(CallError::Cancelled);
            }
            count += 1;
            if first.is_none() {
                let value = match row.text(0) {
                    Ok(text) => text,
                    Err(CellError::Empty { .. }) => String::new(),
                    Err(error) => return Err(input.locate(error).into()),
                };
                first = Some(value);
            }
        }

        let outcome = self.evaluate(first.as_deref(), count).await;
        outcome.log(call.function_id());
        output
            .send(Row::new(vec![Cell::text(outcome.render())]))
            .await?;
        Ok(())
    }
}
