//! Plugin bootstrap orchestration.
//!
//! Every failure here is fatal: the plugin never starts serving with a
//! partial manifest, a half-configured TLS setup, or an unhandled function.

use std::net::SocketAddr;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use sse_config::{Config, ConfigError, TlsMaterial, TlsMaterialError, TlsPem};
use sse_manifest::{FunctionManifest, ManifestError};
use sse_predict::{BackendError, BackendSettings, HttpPredictionBackend, PredictionBackend};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::capabilities::CapabilityNegotiator;
use crate::dispatch::{ConnectorService, DispatchBuildError, DispatchTable, Dispatcher, ExecutionLimits};
use crate::functions::{HandlerCatalogue, HandlerDeps};
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{ServerError, SseServer, SystemShutdownSignal};

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the plugin configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Configuration loaded but holds unusable values.
    #[error("invalid configuration: {source}")]
    InvalidConfiguration {
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The function manifest is missing or invalid.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// TLS was requested but the material is unusable.
    #[error("TLS material unavailable: {source}")]
    Tls {
        /// Underlying material error.
        #[source]
        source: TlsMaterialError,
    },
    /// The prediction service URL does not parse.
    #[error("invalid prediction service URL '{url}': {source}")]
    BackendUrl {
        /// Configured URL.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The prediction client could not be built.
    #[error("failed to build prediction client: {source}")]
    Backend {
        /// Client construction failure.
        #[source]
        source: BackendError,
    },
    /// A manifest function has no handler.
    #[error(transparent)]
    Dispatch(#[from] DispatchBuildError),
}

/// Result of a successful bootstrap: everything needed to serve.
pub struct Plugin {
    config: Config,
    manifest: Arc<FunctionManifest>,
    address: SocketAddr,
    tls: Option<TlsPem>,
    service: ConnectorService,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Plugin {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The validated manifest being advertised.
    #[must_use]
    pub fn manifest(&self) -> &FunctionManifest {
        &self.manifest
    }

    /// Address the listener will bind.
    #[must_use]
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Returns `true` when the listener will require mutual TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// The service instance, shared with any server started from it.
    #[must_use]
    pub fn service(&self) -> &ConnectorService {
        &self.service
    }

    /// Binds the listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address is unavailable.
    pub async fn bind(self) -> Result<SseServer, ServerError> {
        let Self {
            address,
            tls,
            service,
            reporter,
            ..
        } = self;
        let bound = SseServer::bind(address, tls.as_ref(), service, Arc::clone(&reporter)).await;
        if let Err(error) = &bound {
            reporter.server_failed(error);
        }
        bound
    }

    /// Binds, serves, and returns after SIGINT or SIGTERM once in-flight
    /// calls have drained.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding, signal installation, or the
    /// transport fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let server = self.bind().await?;
        let signal = SystemShutdownSignal::install()?;
        server.serve_until(signal.wait()).await
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("address", &self.address)
            .field("secure", &self.tls.is_some())
            .field("functions", &self.manifest.len())
            .finish_non_exhaustive()
    }
}

/// Bootstraps the plugin with the HTTP prediction client and the shipped
/// handlers.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered; it is also reported
/// through `reporter`.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Plugin, BootstrapError> {
    bootstrap(loader, reporter, &HandlerCatalogue::standard(), |config| {
        let client = HttpPredictionBackend::new(backend_settings(config)?)
            .map_err(|source| BootstrapError::Backend { source })?;
        Ok(Arc::new(client))
    })
}

/// Bootstraps the plugin around a caller-supplied prediction backend and
/// handler catalogue.
///
/// # Errors
///
/// As for [`bootstrap_with`].
pub fn bootstrap_with_backend(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    backend: Arc<dyn PredictionBackend>,
    catalogue: &HandlerCatalogue,
) -> Result<Plugin, BootstrapError> {
    bootstrap(loader, reporter, catalogue, |_| Ok(backend))
}

fn bootstrap<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    catalogue: &HandlerCatalogue,
    backend: F,
) -> Result<Plugin, BootstrapError>
where
    F: FnOnce(&Config) -> Result<Arc<dyn PredictionBackend>, BootstrapError>,
{
    reporter.bootstrap_starting();
    match assemble(loader, Arc::clone(&reporter), catalogue, backend) {
        Ok(plugin) => {
            reporter.bootstrap_succeeded(&plugin.config, plugin.manifest.len());
            Ok(plugin)
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn assemble<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    catalogue: &HandlerCatalogue,
    backend: F,
) -> Result<Plugin, BootstrapError>
where
    F: FnOnce(&Config) -> Result<Arc<dyn PredictionBackend>, BootstrapError>,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    config
        .validate()
        .map_err(|source| BootstrapError::InvalidConfiguration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let manifest = Arc::new(FunctionManifest::load(config.definition_file())?);
    let address = config
        .listen_address()
        .map_err(|source| BootstrapError::InvalidConfiguration { source })?;
    let tls = read_tls(&config).map_err(|source| BootstrapError::Tls { source })?;

    let deps = HandlerDeps {
        backend: backend(&config)?,
        feature_dir: config.feature_dir().to_path_buf(),
    };
    let table = DispatchTable::build(&manifest, catalogue, &deps)?;
    let dispatcher = Dispatcher::new(
        table,
        ExecutionLimits::new(config.workers(), config.bundle_rows()),
    );
    let service = ConnectorService::new(CapabilityNegotiator::new(Arc::clone(&manifest)), dispatcher);

    Ok(Plugin {
        config,
        manifest,
        address,
        tls,
        service,
        telemetry,
        reporter,
    })
}

fn read_tls(config: &Config) -> Result<Option<TlsPem>, TlsMaterialError> {
    config
        .tls_material()?
        .as_ref()
        .map(TlsMaterial::read)
        .transpose()
}

fn backend_settings(config: &Config) -> Result<BackendSettings, BootstrapError> {
    let url = Url::parse(&config.backend_url).map_err(|source| BootstrapError::BackendUrl {
        url: config.backend_url.clone(),
        source,
    })?;
    let settings = BackendSettings::new(url, config.backend_model.clone())
        .with_credentials(
            config.backend_username.clone(),
            config.backend_api_key.clone(),
        )
        .with_attempts(config.backend_attempts);
    if settings.credentials().is_none() {
        warn!(
            target: BOOTSTRAP_TARGET,
            url = %settings.base_url(),
            "prediction service credentials are not configured; every prediction will fail"
        );
    }
    Ok(settings)
}
