//! The `qlik.sse.Connector` service implementation.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tonic::metadata::MetadataValue;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};

use crate::capabilities::CapabilityNegotiator;
use crate::codec::{FailureReporter, InboundRows, ResponseStream, RowSink};
use crate::functions::{CachePolicy, FunctionHandler};
use crate::proto::connector_server::Connector;
use crate::proto::{BundledRows, CACHE_HEADER, CACHE_NO_STORE, Capabilities, Empty};

use super::DISPATCH_TARGET;
use super::context::CallContext;
use super::errors::CallError;
use super::table::DispatchTable;

/// Bundles buffered per call before the handler is suspended.
const RESPONSE_BUFFER_BUNDLES: usize = 4;

/// Resource bounds applied to execution calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionLimits {
    /// Calls whose handlers may run at once.
    pub workers: usize,
    /// Maximum rows per outbound bundle.
    pub bundle_rows: usize,
    /// Outbound bundles buffered per call.
    pub response_buffer: usize,
}

impl ExecutionLimits {
    /// Limits with the default response buffer.
    #[must_use]
    pub const fn new(workers: usize, bundle_rows: usize) -> Self {
        Self {
            workers,
            bundle_rows,
            response_buffer: RESPONSE_BUFFER_BUNDLES,
        }
    }
}

/// Starts handlers for resolved calls under a bounded worker pool.
#[derive(Debug)]
pub struct Dispatcher {
    table: DispatchTable,
    permits: Arc<Semaphore>,
    limits: ExecutionLimits,
}

impl Dispatcher {
    /// Creates a dispatcher over `table`.
    #[must_use]
    pub fn new(table: DispatchTable, limits: ExecutionLimits) -> Self {
        Self {
            table,
            permits: Arc::new(Semaphore::new(limits.workers.max(1))),
            limits,
        }
    }

    /// Resolves the call and starts its handler in the background.
    ///
    /// The handler waits for a worker permit before reading any input. The
    /// returned stream yields its output bundles, followed by an error
    /// status if the handler fails.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownFunction`] when the id is not in the
    /// table. Nothing is spawned in that case.
    pub fn start(
        &self,
        context: CallContext,
        input: InboundRows,
    ) -> Result<(CachePolicy, ResponseStream), CallError> {
        let entry = self.table.resolve(context.function_id())?;
        let handler = Arc::clone(entry.handler());
        let policy = handler.cache_policy();
        let call = context.with_cache_policy(policy);

        info!(
            target: DISPATCH_TARGET,
            function_id = call.function_id(),
            function = %entry.definition().name(),
            app_id = call.common().map(|common| common.app_id.as_str()),
            "executing function"
        );

        let (sink, stream) = RowSink::channel(self.limits.bundle_rows, self.limits.response_buffer);
        let reporter = sink.reporter();
        tokio::spawn(supervise(
            Arc::clone(&self.permits),
            handler,
            call,
            input,
            sink,
            reporter,
        ));
        Ok((policy, stream))
    }

    /// Permits currently free in the worker pool.
    #[must_use]
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }
}

async fn supervise(
    permits: Arc<Semaphore>,
    handler: Arc<dyn FunctionHandler>,
    context: CallContext,
    input: InboundRows,
    sink: RowSink,
    reporter: FailureReporter,
) {
    let function_id = context.function_id();
    let Ok(_permit) = permits.acquire_owned().await else {
        reporter
            .fail(Status::unavailable("the server is shutting down"))
            .await;
        return;
    };

    let outcome = match tokio::spawn(run_handler(handler, context, input, sink)).await {
        Ok(result) => result,
        Err(error) if error.is_panic() => Err(CallError::internal("function handler panicked")),
        Err(_) => Err(CallError::Cancelled),
    };

    match outcome {
        Ok(bundles) => debug!(
            target: DISPATCH_TARGET,
            function_id,
            bundles,
            "function completed"
        ),
        Err(CallError::Cancelled) => info!(
            target: DISPATCH_TARGET,
            function_id,
            "function call cancelled by the caller"
        ),
        Err(error) => {
            warn!(
                target: DISPATCH_TARGET,
                function_id,
                code = ?error.code(),
                %error,
                "function call failed"
            );
            reporter.fail(Status::from(error)).await;
        }
    }
}

async fn run_handler(
    handler: Arc<dyn FunctionHandler>,
    context: CallContext,
    mut input: InboundRows,
    mut sink: RowSink,
) -> Result<usize, CallError> {
    handler.execute(&context, &mut input, &mut sink).await?;
    Ok(sink.finish().await?)
}

/// gRPC front end: capability queries and execution calls.
#[derive(Debug, Clone)]
pub struct ConnectorService {
    negotiator: Arc<CapabilityNegotiator>,
    dispatcher: Arc<Dispatcher>,
}

impl ConnectorService {
    /// Creates the service.
    #[must_use]
    pub fn new(negotiator: CapabilityNegotiator, dispatcher: Dispatcher) -> Self {
        Self {
            negotiator: Arc::new(negotiator),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// The dispatcher serving execution calls.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[tonic::async_trait]
impl Connector for ConnectorService {
    async fn get_capabilities(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<Capabilities>, Status> {
        info!(target: DISPATCH_TARGET, "capabilities requested");
        Ok(Response::new(self.negotiator.capabilities()))
    }

    type ExecuteFunctionStream = ResponseStream;

    async fn execute_function(
        &self,
        request: Request<Streaming<BundledRows>>,
    ) -> Result<Response<Self::ExecuteFunctionStream>, Status> {
        let context = CallContext::from_metadata(request.metadata()).map_err(rejected)?;
        let input = InboundRows::new(request.into_inner());
        let (policy, stream) = self.dispatcher.start(context, input).map_err(rejected)?;

        let mut response = Response::new(stream);
        if policy == CachePolicy::NoStore {
            response
                .metadata_mut()
                .insert(CACHE_HEADER, MetadataValue::from_static(CACHE_NO_STORE));
        }
        Ok(response)
    }
}

fn rejected(error: CallError) -> Status {
    warn!(
        target: DISPATCH_TARGET,
        code = ?error.code(),
        %error,
        "execution call rejected"
    );
    Status::from(error)
}
