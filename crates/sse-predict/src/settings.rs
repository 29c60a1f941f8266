//! Explicit connection settings for the HTTP adapter.

use std::fmt;
use std::time::Duration;

use url::Url;

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Base delay between retry attempts; multiplied by the attempt number.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Everything the HTTP adapter needs to reach the prediction service.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendSettings {
    base_url: Url,
    model: String,
    username: Option<String>,
    api_key: Option<String>,
    attempts: u32,
    timeout: Duration,
    retry_delay: Duration,
}

impl BackendSettings {
    /// Creates settings for `model` hosted under `base_url`, with no
    /// credentials, a single attempt, and default timings.
    #[must_use]
    pub fn new(base_url: Url, model: impl Into<String>) -> Self {
        Self {
            base_url,
            model: model.into(),
            username: None,
            api_key: None,
            attempts: 1,
            timeout: DEFAULT_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Sets the account credentials.
    #[must_use]
    pub fn with_credentials(mut self, username: Option<String>, api_key: Option<String>) -> Self {
        self.username = username.filter(|value| !value.trim().is_empty());
        self.api_key = api_key.filter(|value| !value.trim().is_empty());
        self
    }

    /// Sets how many times a transient failure is attempted. Clamped to 1.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the base delay between attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Service root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Remote model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    /// Username and API key, when both are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.username.as_deref().zip(self.api_key.as_deref())
    }

    /// Attempts per prediction.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base delay between attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("attempts", &self.attempts)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
