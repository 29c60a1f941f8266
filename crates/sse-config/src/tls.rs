//! Layout of the TLS material consumed by the listener.
//!
//! Secure mode needs exactly three PEM files inside the configured
//! directory. Partial material is rejected up front so the daemon never
//! falls back to plaintext after an operator asked for TLS.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Server private key file name.
pub const SERVER_KEY_FILE: &str = "sse_server_key.pem";
/// Server certificate chain file name.
pub const SERVER_CERT_FILE: &str = "sse_server_cert.pem";
/// Root certificate used to verify connecting clients.
pub const ROOT_CERT_FILE: &str = "root_cert.pem";

/// Paths to the three PEM artefacts, verified to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    key: Utf8PathBuf,
    cert: Utf8PathBuf,
    root: Utf8PathBuf,
}

/// PEM contents read from a [`TlsMaterial`] layout.
#[derive(Clone)]
pub struct TlsPem {
    /// Server private key.
    pub key: Vec<u8>,
    /// Server certificate chain.
    pub cert: Vec<u8>,
    /// Root certificate for client verification.
    pub root: Vec<u8>,
}

impl std::fmt::Debug for TlsPem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsPem")
            .field("key", &"<redacted>")
            .field("cert_len", &self.cert.len())
            .field("root_len", &self.root.len())
            .finish()
    }
}

/// Errors raised while resolving or reading TLS material.
#[derive(Debug, Error)]
pub enum TlsMaterialError {
    /// The configured directory does not exist.
    #[error("TLS directory '{path}' does not exist")]
    MissingDirectory {
        /// Configured directory.
        path: Utf8PathBuf,
    },
    /// One or more PEM files are absent.
    #[error("TLS directory '{path}' is incomplete; missing {}", missing.join(", "))]
    Incomplete {
        /// Configured directory.
        path: Utf8PathBuf,
        /// File names that were not found.
        missing: Vec<&'static str>,
    },
    /// A PEM file exists but could not be read.
    #[error("failed to read TLS file '{path}': {source}")]
    Read {
        /// File that failed to read.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl TlsMaterial {
    /// Resolves the PEM layout under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TlsMaterialError::MissingDirectory`] when `dir` is not a
    /// directory and [`TlsMaterialError::Incomplete`] naming every absent file.
    pub fn from_dir(dir: &Utf8Path) -> Result<Self, TlsMaterialError> {
        if !dir.is_dir() {
            return Err(TlsMaterialError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }

        let missing: Vec<&'static str> = [SERVER_KEY_FILE, SERVER_CERT_FILE, ROOT_CERT_FILE]
            .into_iter()
            .filter(|name| !dir.join(name).is_file())
            .collect();
        if !missing.is_empty() {
            return Err(TlsMaterialError::Incomplete {
                path: dir.to_path_buf(),
                missing,
            });
        }

        Ok(Self {
            key: dir.join(SERVER_KEY_FILE),
            cert: dir.join(SERVER_CERT_FILE),
            root: dir.join(ROOT_CERT_FILE),
        })
    }

    /// Path to the server private key.
    #[must_use]
    pub fn key_path(&self) -> &Utf8Path {
        &self.key
    }

    /// Path to the server certificate chain.
    #[must_use]
    pub fn cert_path(&self) -> &Utf8Path {
        &self.cert
    }

    /// Path to the root certificate.
    #[must_use]
    pub fn root_path(&self) -> &Utf8Path {
        &self.root
    }

    /// Reads all three PEM files.
    ///
    /// # Errors
    ///
    /// Returns [`TlsMaterialError::Read`] for the first file that fails.
    pub fn read(&self) -> Result<TlsPem, TlsMaterialError> {
        Ok(TlsPem {
            key: read_pem(&self.key)?,
            cert: read_pem(&self.cert)?,
            root: read_pem(&self.root)?,
        })
    }
}

fn read_pem(path: &Utf8Path) -> Result<Vec<u8>, TlsMaterialError> {
    fs::read(path).map_err(|source| TlsMaterialError::Read {
        path: path.to_path_buf(),
        source,
    })
}
