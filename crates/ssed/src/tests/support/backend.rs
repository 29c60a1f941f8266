//! Prediction backend double with a fixed answer.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sse_predict::{BackendError, FeatureSet, Prediction, PredictionBackend};

/// Answers every prediction with the same value, or fails when offline.
#[derive(Debug)]
pub struct FixedBackend {
    answer: Option<Prediction>,
    calls: AtomicUsize,
}

impl FixedBackend {
    pub fn answering(value: f64, confidence: f64) -> Self {
        Self {
            answer: Some(Prediction::new(value, confidence)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn offline() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionBackend for FixedBackend {
    async fn predict(&self, _features: &FeatureSet) -> Result<Prediction, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.ok_or_else(|| BackendError::Unreachable {
            url: String::from("http://127.0.0.1:9/prediction"),
            message: String::from("connection refused"),
        })
    }
}
