//! Shared harness for the plugin test suites.

mod backend;
mod client;
mod plugin_dir;
mod reporter;
mod world;

pub use backend::FixedBackend;
pub use client::{connect, execute};
pub use plugin_dir::PluginDir;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};
