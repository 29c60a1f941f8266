//! End-to-end calls against a plugin served on a loopback port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore, oneshot};
use tokio::task::JoinHandle;
use tonic::Code;

use crate::bootstrap::{StaticConfigLoader, bootstrap_with_backend};
use crate::codec::{Cell, InboundRows, Row, RowSink};
use crate::dispatch::{CallContext, CallError};
use crate::functions::{CachePolicy, FunctionHandler, HandlerCatalogue};
use crate::health::HealthReporter;
use crate::transport::ServerError;

use super::support::{
    FixedBackend, HealthEvent, PluginDir, RecordingHealthReporter, connect, execute,
};

const LOOPBACK_MANIFEST: &str = r#"{"Functions":[
    {"Name":"Predict","Id":0,"Type":0,"ReturnType":0,"Params":{"player":0}},
    {"Name":"Echo","Id":1,"Type":0,"ReturnType":0,"Params":{"value":0}},
    {"Name":"Fresh","Id":2,"Type":0,"ReturnType":0,"Params":{"value":0}},
    {"Name":"Boom","Id":3,"Type":0,"ReturnType":0,"Params":{"value":0}},
    {"Name":"Held","Id":4,"Type":0,"ReturnType":0,"Params":{"value":0}}
]}"#;

struct EchoHandler {
    policy: CachePolicy,
}

#[async_trait]
impl FunctionHandler for EchoHandler {
    async fn execute(
        &self,
        _call: &CallContext,
        input: &mut InboundRows,
        output: &mut RowSink,
    ) -> Result<(), CallError> {
        while let Some(row) = input.next_row().await? {
            output.send(row).await?;
        }
        Ok(())
    }

    fn cache_policy(&self) -> CachePolicy {
        self.policy
    }
}

struct PanickingHandler;

#[async_trait]
impl FunctionHandler for PanickingHandler {
    async fn execute(
        &self,
        _call: &CallContext,
        _input: &mut InboundRows,
        _output: &mut RowSink,
    ) -> Result<(), CallError> {
        panic!("handler bug");
    }
}

struct HeldHandler {
    gate: Arc<Semaphore>,
    entered: Arc<Notify>,
}

#[async_trait]
impl FunctionHandler for HeldHandler {
    async fn execute(
        &self,
        _call: &CallContext,
        _input: &mut InboundRows,
        output: &mut RowSink,
    ) -> Result<(), CallError> {
        self.entered.notify_one();
        self.gate.acquire().await.expect("gate stays open").forget();
        output.send(Row::new(vec![Cell::text("held")])).await?;
        Ok(())
    }
}

struct Harness {
    _dir: PluginDir,
    address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<Result<(), ServerError>>,
    gate: Arc<Semaphore>,
    entered: Arc<Notify>,
}

async fn serve() -> Harness {
    let dir = PluginDir::new();
    dir.write_manifest(LOOPBACK_MANIFEST);
    let gate = Arc::new(Semaphore::new(0));
    let entered = Arc::new(Notify::new());
    let catalogue = {
        let gate = Arc::clone(&gate);
        let entered = Arc::clone(&entered);
        HandlerCatalogue::standard()
            .register("Echo", |_| {
                Arc::new(EchoHandler {
                    policy: CachePolicy::Allow,
                })
            })
            .register("Fresh", |_| {
                Arc::new(EchoHandler {
                    policy: CachePolicy::NoStore,
                })
            })
            .register("Boom", |_| Arc::new(PanickingHandler))
            .register("Held", move |_| {
                Arc::new(HeldHandler {
                    gate: Arc::clone(&gate),
                    entered: Arc::clone(&entered),
                })
            })
    };

    let reporter: Arc<dyn HealthReporter> = Arc::new(RecordingHealthReporter::default());
    let plugin = bootstrap_with_backend(
        &StaticConfigLoader::new(dir.config()),
        reporter,
        Arc::new(FixedBackend::answering(24.53, 0.83)),
        &catalogue,
    )
    .expect("bootstrap succeeds");
    let server = plugin.bind().await.expect("listener binds");
    let address = server.local_addr();
    let (shutdown, signal) = oneshot::channel::<()>();
    let server = tokio::spawn(server.serve_until(async move {
        signal.await.ok();
    }));

    Harness {
        _dir: dir,
        address,
        shutdown,
        server,
        gate,
        entered,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_function_fails_without_disturbing_concurrent_calls() {
    let harness = serve().await;
    let mut good = connect(harness.address).await;
    let mut bad = connect(harness.address).await;

    let (valid, unknown) = tokio::join!(
        execute(&mut good, 0, &["Kevin Durant"]),
        execute(&mut bad, 99, &["Kevin Durant"]),
    );

    let reply = valid.expect("valid call accepted");
    assert!(reply.failure.is_none());
    assert_eq!(reply.rows.len(), 1);
    assert!(reply.rows[0].starts_with("Predicted number of PPG: 24.5"));
    assert_eq!(unknown.expect_err("unknown id").code(), Code::NotFound);
}

#[tokio::test]
async fn large_inputs_stream_back_in_order() {
    let harness = serve().await;
    let mut client = connect(harness.address).await;
    let values: Vec<String> = (0..2500).map(|index| format!("row-{index}")).collect();
    let borrowed: Vec<&str> = values.iter().map(String::as_str).collect();

    let reply = execute(&mut client, 1, &borrowed).await.expect("echo accepted");

    assert!(reply.failure.is_none());
    assert_eq!(reply.rows, values);
    assert!(!reply.no_store);
}

#[tokio::test]
async fn no_store_handlers_disable_host_caching() {
    let harness = serve().await;
    let mut client = connect(harness.address).await;

    let fresh = execute(&mut client, 2, &["a"]).await.expect("call accepted");
    let cached = execute(&mut client, 1, &["a"]).await.expect("call accepted");

    assert!(fresh.no_store);
    assert!(!cached.no_store);
}

#[tokio::test]
async fn panicking_handler_reports_internal_and_server_keeps_serving() {
    let harness = serve().await;
    let mut client = connect(harness.address).await;

    let reply = execute(&mut client, 3, &["a"]).await.expect("call accepted");
    let failure = reply.failure.expect("stream fails");
    assert_eq!(failure.code(), Code::Internal);
    assert_eq!(failure.message(), "function execution failed");

    let next = execute(&mut client, 1, &["still serving"])
        .await
        .expect("next call accepted");
    assert_eq!(next.rows, ["still serving"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_waits_for_in_flight_calls() {
    let harness = serve().await;
    let address = harness.address;
    let call = tokio::spawn(async move {
        let mut client = connect(address).await;
        execute(&mut client, 4, &["x"]).await
    });

    harness.entered.notified().await;
    harness.shutdown.send(()).expect("server listening for shutdown");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!harness.server.is_finished(), "server stopped with a call in flight");

    harness.gate.add_permits(1);
    let reply = call
        .await
        .expect("call task joins")
        .expect("held call accepted");
    assert_eq!(reply.rows, ["held"]);

    let stopped = tokio::time::timeout(Duration::from_secs(5), harness.server)
        .await
        .expect("server drains")
        .expect("server task joins");
    assert!(stopped.is_ok(), "{stopped:?}");
}

#[tokio::test]
async fn occupied_port_is_a_bind_error() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("reserve a port");
    let port = occupied.local_addr().expect("reserved address").port();
    let dir = PluginDir::new();
    let config = sse_config::Config {
        port,
        ..dir.config()
    };
    let reporter = Arc::new(RecordingHealthReporter::default());

    let plugin = bootstrap_with_backend(
        &StaticConfigLoader::new(config),
        Arc::clone(&reporter) as Arc<dyn HealthReporter>,
        Arc::new(FixedBackend::offline()),
        &HandlerCatalogue::standard(),
    )
    .expect("bootstrap succeeds");
    let error = plugin.bind().await.expect_err("port is taken");

    assert!(matches!(error, ServerError::Bind { .. }));
    assert!(error.to_string().contains(&port.to_string()), "{error}");
    let events = reporter.events();
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::ServerFailed(_))),
        "{events:?}"
    );
}

#[tokio::test]
async fn malformed_tls_material_fails_before_listening() {
    let dir = PluginDir::new();
    for file in [
        sse_config::SERVER_KEY_FILE,
        sse_config::SERVER_CERT_FILE,
        sse_config::ROOT_CERT_FILE,
    ] {
        dir.write_file(&format!("sse_certs/{file}"), "not a pem document");
    }
    let config = sse_config::Config {
        pem_dir: Some(dir.root().join("sse_certs")),
        ..dir.config()
    };
    let reporter = Arc::new(RecordingHealthReporter::default());

    let plugin = bootstrap_with_backend(
        &StaticConfigLoader::new(config),
        Arc::clone(&reporter) as Arc<dyn HealthReporter>,
        Arc::new(FixedBackend::offline()),
        &HandlerCatalogue::standard(),
    )
    .expect("bootstrap only checks the files exist");
    assert!(plugin.is_secure());
    let error = plugin.bind().await.expect_err("PEM is rejected");

    assert!(matches!(error, ServerError::Tls { .. }), "{error:?}");
    let events = reporter.events();
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, HealthEvent::ListenerBound { .. })),
        "{events:?}"
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::ServerFailed(_))),
        "{events:?}"
    );
}
