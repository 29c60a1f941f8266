//! Shared configuration for the SSE prediction plugin.
//!
//! [`Config`] is resolved through `ortho_config`, layering built-in defaults,
//! an optional configuration file, `SSE_*` environment variables, and command
//! line flags (highest precedence). The daemon reads it exactly once during
//! bootstrap; nothing in the process mutates it afterwards.

mod defaults;
mod logging;
mod tls;

use std::net::{SocketAddr, ToSocketAddrs};

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_BACKEND_ATTEMPTS, DEFAULT_BACKEND_MODEL, DEFAULT_BACKEND_URL, DEFAULT_BUNDLE_ROWS,
    DEFAULT_DEFINITION_FILE, DEFAULT_FEATURE_DIR, DEFAULT_LISTEN_HOST, DEFAULT_LOG_FILTER,
    DEFAULT_PORT, DEFAULT_WORKERS, default_log_filter, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use tls::{
    ROOT_CERT_FILE, SERVER_CERT_FILE, SERVER_KEY_FILE, TlsMaterial, TlsMaterialError, TlsPem,
};

/// Resolved plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SSE")]
pub struct Config {
    /// TCP port the gRPC listener binds to.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Host or address the listener binds to.
    #[ortho_config(default = String::from(DEFAULT_LISTEN_HOST))]
    pub listen_host: String,
    /// Directory holding the TLS material. Plaintext when unset.
    pub pem_dir: Option<Utf8PathBuf>,
    /// Path to the JSON function manifest.
    #[ortho_config(default = Utf8PathBuf::from(DEFAULT_DEFINITION_FILE))]
    pub definition_file: Utf8PathBuf,
    /// Base URL of the prediction service.
    #[ortho_config(default = String::from(DEFAULT_BACKEND_URL))]
    pub backend_url: String,
    /// Account name presented to the prediction service.
    pub backend_username: Option<String>,
    /// API key presented to the prediction service.
    pub backend_api_key: Option<String>,
    /// Remote model the prediction service evaluates.
    #[ortho_config(default = String::from(DEFAULT_BACKEND_MODEL))]
    pub backend_model: String,
    /// Attempts made per prediction before giving up.
    #[ortho_config(default = DEFAULT_BACKEND_ATTEMPTS)]
    pub backend_attempts: u32,
    /// Directory containing per-player feature files.
    #[ortho_config(default = Utf8PathBuf::from(DEFAULT_FEATURE_DIR))]
    pub feature_dir: Utf8PathBuf,
    /// Size of the worker pool serving calls.
    #[ortho_config(default = DEFAULT_WORKERS)]
    pub workers: usize,
    /// Maximum rows packed into one outbound bundle.
    #[ortho_config(default = DEFAULT_BUNDLE_ROWS)]
    pub bundle_rows: usize,
    /// `tracing` filter expression.
    #[ortho_config(default = String::from(DEFAULT_LOG_FILTER))]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            listen_host: String::from(DEFAULT_LISTEN_HOST),
            pem_dir: None,
            definition_file: Utf8PathBuf::from(DEFAULT_DEFINITION_FILE),
            backend_url: String::from(DEFAULT_BACKEND_URL),
            backend_username: None,
            backend_api_key: None,
            backend_model: String::from(DEFAULT_BACKEND_MODEL),
            backend_attempts: DEFAULT_BACKEND_ATTEMPTS,
            feature_dir: Utf8PathBuf::from(DEFAULT_FEATURE_DIR),
            workers: DEFAULT_WORKERS,
            bundle_rows: DEFAULT_BUNDLE_ROWS,
            log_filter: String::from(DEFAULT_LOG_FILTER),
            log_format: default_log_format(),
        }
    }
}

/// Errors raised when a loaded configuration is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric setting that must be positive was zero.
    #[error("'{field}' must be at least 1")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The listen host was blank.
    #[error("listen host must not be empty")]
    EmptyListenHost,
    /// The listen host did not resolve to any socket address.
    #[error("cannot resolve listen address '{host}:{port}': {message}")]
    UnresolvableHost {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Resolver diagnostic.
        message: String,
    },
}

impl Config {
    /// Checks invariants that the layered loader cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a pool or bundle size is zero, or when the
    /// listen host is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_host.trim().is_empty() {
            return Err(ConfigError::EmptyListenHost);
        }
        if self.workers == 0 {
            return Err(ConfigError::NotPositive { field: "workers" });
        }
        if self.bundle_rows == 0 {
            return Err(ConfigError::NotPositive {
                field: "bundle_rows",
            });
        }
        if self.backend_attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "backend_attempts",
            });
        }
        Ok(())
    }

    /// Listen port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Listen host.
    #[must_use]
    pub fn listen_host(&self) -> &str {
        self.listen_host.trim()
    }

    /// Resolves the configured host and port to the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyListenHost`] for a blank host and
    /// [`ConfigError::UnresolvableHost`] when resolution yields nothing.
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.listen_host();
        if host.is_empty() {
            return Err(ConfigError::EmptyListenHost);
        }
        let unresolvable = |message: String| ConfigError::UnresolvableHost {
            host: host.to_owned(),
            port: self.port,
            message,
        };
        (host, self.port)
            .to_socket_addrs()
            .map_err(|error| unresolvable(error.to_string()))?
            .next()
            .ok_or_else(|| unresolvable(String::from("no addresses returned")))
    }

    /// Manifest path.
    #[must_use]
    pub fn definition_file(&self) -> &Utf8Path {
        self.definition_file.as_path()
    }

    /// Directory holding per-player feature files.
    #[must_use]
    pub fn feature_dir(&self) -> &Utf8Path {
        self.feature_dir.as_path()
    }

    /// Number of workers serving concurrent calls.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Maximum rows per outbound bundle.
    #[must_use]
    pub fn bundle_rows(&self) -> usize {
        self.bundle_rows
    }

    /// Configured log filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Configured log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns `true` when TLS was requested.
    #[must_use]
    pub fn tls_requested(&self) -> bool {
        self.pem_dir.is_some()
    }

    /// Resolves the TLS material layout under `pem_dir`.
    ///
    /// Returns `Ok(None)` when TLS is not requested.
    ///
    /// # Errors
    ///
    /// Returns [`TlsMaterialError`] when the directory is missing or any of
    /// the three PEM files is absent.
    pub fn tls_material(&self) -> Result<Option<TlsMaterial>, TlsMaterialError> {
        self.pem_dir
            .as_deref()
            .map(TlsMaterial::from_dir)
            .transpose()
    }
}
