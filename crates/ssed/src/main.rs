use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ssed::{HealthReporter, StructuredHealthReporter, SystemConfigLoader, bootstrap_with};

fn main() -> ExitCode {
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    let plugin = match bootstrap_with(&SystemConfigLoader, reporter) {
        Ok(plugin) => plugin,
        Err(error) => return report(&error),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(plugin.config().workers())
        .thread_name("ssed-worker")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => return report(&error),
    };

    match runtime.block_on(plugin.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(&error),
    }
}

fn report(error: &dyn Error) -> ExitCode {
    writeln!(io::stderr().lock(), "ssed: {error}").ok();
    ExitCode::FAILURE
}
