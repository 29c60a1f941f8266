//! Build script: generate the `qlik.sse.Connector` service stubs.
//!
//! The message types are declared by hand in `src/proto.rs`, so only the
//! service glue is generated and no `protoc` is needed at build time.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic::codec::ProstCodec";

fn main() {
    let get_capabilities = Method::builder()
        .name("get_capabilities")
        .route_name("GetCapabilities")
        .input_type("crate::proto::Empty")
        .output_type("crate::proto::Capabilities")
        .codec_path(CODEC)
        .build();

    let execute_function = Method::builder()
        .name("execute_function")
        .route_name("ExecuteFunction")
        .input_type("crate::proto::BundledRows")
        .output_type("crate::proto::BundledRows")
        .codec_path(CODEC)
        .client_streaming()
        .server_streaming()
        .build();

    let connector = Service::builder()
        .name("Connector")
        .package("qlik.sse")
        .method(get_capabilities)
        .method(execute_function)
        .build();

    Builder::new().compile(&[connector]);
    println!("cargo:rerun-if-changed=build.rs");
}
