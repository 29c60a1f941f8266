//! Test suites for the plugin bootstrap and gRPC surface.

mod bootstrap_behaviour;
mod loopback;
mod support;
