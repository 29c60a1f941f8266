//! Wire types of the `qlik.sse` protocol and the generated service glue.
//!
//! Field tags match `ServerSideExtension.proto`; only the messages this
//! plugin exchanges are declared.

/// Binary metadata key carrying the [`FunctionRequestHeader`].
pub const FUNCTION_REQUEST_HEADER: &str = "qlik-functionrequestheader-bin";
/// Binary metadata key carrying the optional [`CommonRequestHeader`].
pub const COMMON_REQUEST_HEADER: &str = "qlik-commonrequestheader-bin";
/// Initial metadata key used to control host-side caching.
pub const CACHE_HEADER: &str = "qlik-cache";
/// Value of [`CACHE_HEADER`] disabling host-side caching.
pub const CACHE_NO_STORE: &str = "no-store";

/// Empty request body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Empty {}

/// A cell carrying a numeric and a text representation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Dual {
    /// Numeric representation; `NaN` when absent.
    #[prost(double, tag = "1")]
    pub num_data: f64,
    /// Text representation; empty when absent.
    #[prost(string, tag = "2")]
    pub str_data: ::prost::alloc::string::String,
}

/// One row of cells.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Row {
    /// Cells in column order.
    #[prost(message, repeated, tag = "1")]
    pub duals: ::prost::alloc::vec::Vec<Dual>,
}

/// Unit of transfer on the execution stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BundledRows {
    /// Rows in arrival order.
    #[prost(message, repeated, tag = "1")]
    pub rows: ::prost::alloc::vec::Vec<Row>,
}

/// Parameter of an advertised function.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parameter {
    /// Declared value type.
    #[prost(enumeration = "DataType", tag = "1")]
    pub data_type: i32,
    /// Parameter name.
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
}

/// An advertised function.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionDefinition {
    /// Function name.
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    /// Invocation semantics.
    #[prost(enumeration = "FunctionType", tag = "2")]
    pub function_type: i32,
    /// Return value type.
    #[prost(enumeration = "DataType", tag = "3")]
    pub return_type: i32,
    /// Parameters in binding order.
    #[prost(message, repeated, tag = "4")]
    pub params: ::prost::alloc::vec::Vec<Parameter>,
    /// Identifier used in [`FunctionRequestHeader`].
    #[prost(int32, tag = "5")]
    pub function_id: i32,
}

/// Reply to `GetCapabilities`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Capabilities {
    /// Whether script evaluation is supported.
    #[prost(bool, tag = "1")]
    pub allow_script: bool,
    /// Advertised functions.
    #[prost(message, repeated, tag = "2")]
    pub functions: ::prost::alloc::vec::Vec<FunctionDefinition>,
    /// Plugin name shown by the host.
    #[prost(string, tag = "3")]
    pub plugin_identifier: ::prost::alloc::string::String,
    /// Plugin version shown by the host.
    #[prost(string, tag = "4")]
    pub plugin_version: ::prost::alloc::string::String,
}

/// Per-call header naming the function to execute.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionRequestHeader {
    /// Function identifier.
    #[prost(int32, tag = "1")]
    pub function_id: i32,
    /// Header version.
    #[prost(string, tag = "2")]
    pub version: ::prost::alloc::string::String,
}

/// Per-call header describing the calling app and user.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommonRequestHeader {
    /// Calling app.
    #[prost(string, tag = "1")]
    pub app_id: ::prost::alloc::string::String,
    /// Calling user.
    #[prost(string, tag = "2")]
    pub user_id: ::prost::alloc::string::String,
    /// Number of rows the host expects to send.
    #[prost(int64, tag = "3")]
    pub cardinality: i64,
}

/// Value types on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DataType {
    /// Text.
    String = 0,
    /// Number.
    Numeric = 1,
    /// Number and text.
    Dual = 2,
}

/// Function types on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FunctionType {
    /// Row in, row out.
    Scalar = 0,
    /// Rows in, value out.
    Aggregation = 1,
    /// Table in, table out.
    Tensor = 2,
}

include!(concat!(env!("OUT_DIR"), "/qlik.sse.Connector.rs"));
