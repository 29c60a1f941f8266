//! HTTPS adapter for a hosted ensemble prediction service.
//!
//! Each prediction is a `POST {base_url}/prediction` carrying the model id and
//! the feature object, authenticated with `username` and `api_key` query
//! parameters. The service answers with the predicted `output` and its
//! `confidence`.


use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::backend::PredictionBackend;
use crate::error::BackendError;
use crate::features::{FeatureSet, Prediction};
use crate::settings::BackendSettings;

const BACKEND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::backend");
const PREDICTION_SEGMENT: &str = "prediction";
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    ensemble: &'a str,
    input_data: &'a FeatureSet,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    output: f64,
    confidence: f64,
}

/// [`PredictionBackend`] backed by a remote HTTP service.
#[derive(Debug, Clone)]
pub struct HttpPredictionBackend {
    client: Client,
    endpoint: Url,
    settings: BackendSettings,
}

impl HttpPredictionBackend {
    /// Builds the adapter and its connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Client`] when the HTTP client cannot be built
    /// or the base URL cannot carry a path.
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|error| BackendError::Client {
                message: error.to_string(),
            })?;
        let endpoint = prediction_endpoint(settings.base_url())?;
        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }

    /// URL predictions are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn attempt(
        &self,
        username: &str,
        api_key: &str,
        features: &FeatureSet,
    ) -> Result<Prediction, BackendError> {
        let body = PredictionRequest {
            ensemble: self.settings.model(),
            input_data: features,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("username", username), ("api_key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|error| self.unreachable(&error))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut message, MAX_ERROR_BODY);
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: PredictionResponse =
            response
                .json()
                .await
                .map_err(|error| BackendError::MalformedResponse {
                    message: error.to_string(),
                })?;
        Ok(Prediction::new(decoded.output, decoded.confidence))
    }

    fn unreachable(&self, error: &reqwest::Error) -> BackendError {
        BackendError::Unreachable {
            url: self.endpoint.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionBackend {
    async fn predict(&self, features: &FeatureSet) -> Result<Prediction, BackendError> {
        let (username, api_key) = self
            .settings
            .credentials()
            .ok_or(BackendError::MissingCredentials)?;

        let attempts = self.settings.attempts();
        let mut attempt = 1;
        loop {
            match self.attempt(username, api_key, features).await {
                Ok(prediction) => {
                    debug!(
                        target: BACKEND_TARGET,
                        attempt,
                        value = prediction.value(),
                        confidence = prediction.confidence(),
                        "prediction received"
                    );
                    return Ok(prediction);
                }
                Err(error) if error.is_transient() && attempt < attempts => {
                    warn!(
                        target: BACKEND_TARGET,
                        attempt,
                        attempts,
                        reason = error.reason(),
                        %error,
                        "prediction attempt failed; retrying"
                    );
                    tokio::time::sleep(self.settings.retry_delay() * attempt).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn prediction_endpoint(base: &Url) -> Result<Url, BackendError> {
    let mut endpoint = base.clone();
    endpoint
        .path_segments_mut()
        .map_err(|()| BackendError::Client {
            message: format!("base URL '{base}' cannot carry a path"),
        })?
        .pop_if_empty()
        .push(PREDICTION_SEGMENT);
    Ok(endpoint)
}

fn truncate_on_char_boundary(text: &mut String, limit: usize) {
    if text.len() <= limit {
        return;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
