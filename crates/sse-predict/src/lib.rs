//! Prediction backend adapter for the SSE plugin.
//!
//! Handlers never talk to the remote model service directly. They hand a
//! [`FeatureSet`] to a [`PredictionBackend`] and receive a [`Prediction`] or a
//! typed [`BackendError`]. The production implementation,
//! [`HttpPredictionBackend`], posts the features to a hosted ensemble over
//! HTTPS; tests substitute their own implementation of the trait.
//!
//! Credentials travel in an explicit [`BackendSettings`] value passed to the
//! adapter constructor. Nothing in this crate reads or writes the process
//! environment.

mod backend;
mod error;
mod features;
mod http;
mod settings;

pub use self::backend::PredictionBackend;
pub use self::error::BackendError;
pub use self::features::{FeatureSet, Prediction};
pub use self::http::HttpPredictionBackend;
pub use self::settings::{BackendSettings, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
