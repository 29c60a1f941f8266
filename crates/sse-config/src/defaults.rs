//! Built-in configuration defaults.

/// Port the plugin listens on unless overridden.
pub const DEFAULT_PORT: u16 = 50052;

/// Host the listener binds to: every IPv6 (and mapped IPv4) interface.
pub const DEFAULT_LISTEN_HOST: &str = "::";

/// Manifest path used when none is configured.
pub const DEFAULT_DEFINITION_FILE: &str = "FuncDefs.json";

/// Prediction service base URL.
pub const DEFAULT_BACKEND_URL: &str = "https://bigml.io/andromeda";

/// Pre-trained ensemble evaluated by the prediction service.
pub const DEFAULT_BACKEND_MODEL: &str = "ensemble/5727212049c4a15ca1004b77";

/// Attempts per prediction request.
pub const DEFAULT_BACKEND_ATTEMPTS: u32 = 2;

/// Directory holding per-player feature files.
pub const DEFAULT_FEATURE_DIR: &str = "NBA_data";

/// Worker pool size.
pub const DEFAULT_WORKERS: usize = 10;

/// Rows per outbound bundle.
pub const DEFAULT_BUNDLE_ROWS: usize = 1000;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the daemon.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the daemon.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}
