//! Behavioural tests for the plugin bootstrap sequence.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{self, HealthEvent, TestWorld};

#[fixture]
fn world() -> RefCell<TestWorld> {
    support::world()
}

#[given("a plugin directory with the prediction manifest")]
fn given_prediction_manifest(world: &RefCell<TestWorld>) {
    assert!(world.borrow().dir.manifest_path().exists());
}

#[given("a plugin directory without a manifest")]
fn given_no_manifest(world: &RefCell<TestWorld>) {
    world.borrow().dir.remove_manifest();
}

#[given("a plugin directory with a manifest declaring {name}")]
fn given_manifest_declaring(world: &RefCell<TestWorld>, name: String) {
    let function = name.trim_matches('"');
    world.borrow().dir.write_manifest(&format!(
        r#"{{"Functions":[
            {{"Name":"Predict","Id":0,"Type":0,"ReturnType":0,"Params":{{"player":0}}}},
            {{"Name":"{function}","Id":1,"Type":0,"ReturnType":1}}
        ]}}"#
    ));
}

#[given("a TLS directory holding only the server certificate")]
fn given_partial_tls(world: &RefCell<TestWorld>) {
    let mut world = world.borrow_mut();
    world.dir.write_file("sse_certs/sse_server_cert.pem", "cert");
    let pem_dir = world.dir.root().join("sse_certs");
    world.config.pem_dir = Some(pem_dir);
}

#[given("a worker pool of {count} workers")]
fn given_worker_pool(world: &RefCell<TestWorld>, count: usize) {
    world.borrow_mut().config.workers = count;
}

#[when("the plugin bootstraps")]
fn when_bootstrap_runs(world: &RefCell<TestWorld>) {
    world.borrow_mut().bootstrap();
}

#[then("bootstrap succeeds with {count} function")]
fn then_bootstrap_succeeds(world: &RefCell<TestWorld>, count: usize) {
    let world = world.borrow();
    assert!(
        world.bootstrap_error().is_none(),
        "bootstrap error: {:?}",
        world.bootstrap_error()
    );
    let plugin = world.plugin().expect("plugin bootstrapped");
    assert_eq!(plugin.manifest().len(), count);
    assert!(!plugin.is_secure());
    assert_eq!(plugin.address().ip().to_string(), "127.0.0.1");
}

#[then("bootstrap fails mentioning {text}")]
fn then_bootstrap_fails(world: &RefCell<TestWorld>, text: String) {
    let expected = text.trim_matches('"');
    let world = world.borrow();
    let error = world.bootstrap_error().expect("bootstrap should fail");
    assert!(
        error.to_string().contains(expected),
        "expected '{expected}' in '{error}'"
    );
}

#[then("the reporter recorded bootstrap success")]
fn then_reporter_success(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    assert_eq!(
        events,
        [
            HealthEvent::BootstrapStarting,
            HealthEvent::BootstrapSucceeded { functions: 1 },
        ]
    );
}

#[then("the reporter recorded bootstrap failure")]
fn then_reporter_failure(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    let failed = events
        .iter()
        .any(|event| matches!(event, HealthEvent::BootstrapFailed(_)));
    assert!(failed, "bootstrap failure event missing: {events:?}");
}

#[scenario(
    path = "tests/features/plugin_bootstrap.feature",
    name = "A valid manifest bootstraps the plugin"
)]
fn valid_manifest_bootstraps(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/plugin_bootstrap.feature",
    name = "A missing manifest is fatal"
)]
fn missing_manifest_is_fatal(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/plugin_bootstrap.feature",
    name = "Incomplete TLS material is fatal"
)]
fn incomplete_tls_is_fatal(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/plugin_bootstrap.feature",
    name = "A function without a handler is fatal"
)]
fn unhandled_function_is_fatal(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/plugin_bootstrap.feature",
    name = "A zero-sized worker pool is rejected"
)]
fn zero_workers_rejected(world: RefCell<TestWorld>) {
    drop(world);
}
