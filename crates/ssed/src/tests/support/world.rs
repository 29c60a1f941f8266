//! Scenario world shared by the behaviour suites.

use std::cell::RefCell;
use std::net::SocketAddr;
use std::sync::Arc;

use sse_config::Config;
use sse_predict::PredictionBackend;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::Status;

use crate::bootstrap::{BootstrapError, Plugin, StaticConfigLoader, bootstrap_with_backend};
use crate::functions::HandlerCatalogue;
use crate::health::HealthReporter;
use crate::proto::{Capabilities, Empty};
use crate::transport::ServerError;

use super::backend::FixedBackend;
use super::client::{CallReply, connect, execute, execute_without_header};
use super::plugin_dir::PluginDir;
use super::reporter::RecordingHealthReporter;

struct RunningServer {
    address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), ServerError>>,
}

/// Plugin directory, runtime, and whatever the last step produced.
pub struct TestWorld {
    pub dir: PluginDir,
    pub config: Config,
    pub backend: Arc<FixedBackend>,
    pub reporter: Arc<RecordingHealthReporter>,
    runtime: Runtime,
    plugin: Option<Plugin>,
    bootstrap_error: Option<BootstrapError>,
    server: Option<RunningServer>,
    pub capabilities: Option<Result<Capabilities, Status>>,
    pub reply: Option<Result<CallReply, Status>>,
    pub shutdown_result: Option<Result<(), ServerError>>,
}

/// Builds a fresh world.
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}

impl TestWorld {
    pub fn new() -> Self {
        let dir = PluginDir::new();
        let config = dir.config();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("test runtime");
        Self {
            dir,
            config,
            backend: Arc::new(FixedBackend::answering(24.53, 0.83)),
            reporter: Arc::new(RecordingHealthReporter::default()),
            runtime,
            plugin: None,
            bootstrap_error: None,
            server: None,
            capabilities: None,
            reply: None,
            shutdown_result: None,
        }
    }

    /// Stops any running server and serves again around `backend`.
    pub fn restart_with_backend(&mut self, backend: FixedBackend) {
        self.stop_server();
        self.plugin = None;
        self.bootstrap_error = None;
        self.backend = Arc::new(backend);
        self.start_server();
    }

    /// Runs bootstrap once with the standard handlers.
    pub fn bootstrap(&mut self) {
        if self.plugin.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        let loader = StaticConfigLoader::new(self.config.clone());
        let backend: Arc<dyn PredictionBackend> = self.backend.clone();
        let reporter: Arc<dyn HealthReporter> = self.reporter.clone();
        match bootstrap_with_backend(
            &loader,
            reporter,
            backend,
            &HandlerCatalogue::standard(),
        ) {
            Ok(plugin) => self.plugin = Some(plugin),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    pub fn plugin(&self) -> Option<&Plugin> {
        self.plugin.as_ref()
    }

    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    /// Bootstraps if needed, binds, and serves in the background.
    pub fn start_server(&mut self) {
        self.bootstrap();
        let plugin = self.plugin.take().expect("bootstrap succeeded");
        let server = self
            .runtime
            .block_on(plugin.bind())
            .expect("listener binds");
        let address = server.local_addr();
        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = self.runtime.spawn(server.serve_until(async move {
            signal.await.ok();
        }));
        self.server = Some(RunningServer {
            address,
            shutdown,
            handle,
        });
    }

    fn address(&self) -> SocketAddr {
        self.server.as_ref().expect("server running").address
    }

    pub fn query_capabilities(&mut self) {
        let address = self.address();
        let result = self.runtime.block_on(async move {
            let mut client = connect(address).await;
            client
                .get_capabilities(Empty {})
                .await
                .map(tonic::Response::into_inner)
        });
        self.capabilities = Some(result);
    }

    pub fn call(&mut self, function_id: i32, values: &[&str]) {
        let address = self.address();
        let result = self.runtime.block_on(async move {
            let mut client = connect(address).await;
            execute(&mut client, function_id, values).await
        });
        self.reply = Some(result);
    }

    pub fn call_without_header(&mut self, values: &[&str]) {
        let address = self.address();
        let result = self.runtime.block_on(async move {
            let mut client = connect(address).await;
            execute_without_header(&mut client, values).await
        });
        self.reply = Some(result);
    }

    /// Signals shutdown and waits for the server to drain.
    pub fn stop_server(&mut self) {
        let Some(server) = self.server.take() else {
            return;
        };
        server.shutdown.send(()).ok();
        let result = self
            .runtime
            .block_on(server.handle)
            .expect("server task joins");
        self.shutdown_result = Some(result);
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.shutdown.send(()).ok();
            server.handle.abort();
        }
    }
}
