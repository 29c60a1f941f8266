//! Capability negotiation.
//!
//! The capability descriptor is rebuilt from the manifest on every query.
//! Parameters are advertised sorted by name; the host binds arguments in
//! that order.

use std::sync::Arc;

use sse_manifest::{FunctionDefinition, FunctionManifest};
use tracing::info;

use crate::proto;

const CAPABILITIES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::capabilities");

/// Name the host displays for this plugin.
pub const PLUGIN_IDENTIFIER: &str = "SSE NBA Predict";
/// Version the host displays for this plugin.
pub const PLUGIN_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Answers `GetCapabilities` from a shared manifest.
#[derive(Debug, Clone)]
pub struct CapabilityNegotiator {
    manifest: Arc<FunctionManifest>,
    identifier: String,
    version: String,
}

impl CapabilityNegotiator {
    /// Creates a negotiator with the default plugin identity.
    #[must_use]
    pub fn new(manifest: Arc<FunctionManifest>) -> Self {
        Self::with_identity(manifest, PLUGIN_IDENTIFIER, PLUGIN_VERSION)
    }

    /// Creates a negotiator advertising a custom identity.
    #[must_use]
    pub fn with_identity(
        manifest: Arc<FunctionManifest>,
        identifier: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            manifest,
            identifier: identifier.into(),
            version: version.into(),
        }
    }

    /// Builds the capability descriptor.
    #[must_use]
    pub fn capabilities(&self) -> proto::Capabilities {
        let functions = self
            .manifest
            .functions()
            .iter()
            .map(|definition| {
                let advertised = advertise(definition);
                info!(
                    target: CAPABILITIES_TARGET,
                    function = %definition.name(),
                    function_id = definition.id(),
                    params = ?advertised.params.iter().map(|param| param.name.as_str()).collect::<Vec<_>>(),
                    "adding function to capabilities"
                );
                advertised
            })
            .collect();

        proto::Capabilities {
            allow_script: false,
            functions,
            plugin_identifier: self.identifier.clone(),
            plugin_version: self.version.clone(),
        }
    }
}

fn advertise(definition: &FunctionDefinition) -> proto::FunctionDefinition {
    proto::FunctionDefinition {
        name: definition.name().to_owned(),
        function_type: definition.function_type().code(),
        return_type: definition.return_type().code(),
        params: definition
            .params_by_name()
            .into_iter()
            .map(|param| proto::Parameter {
                data_type: param.data_type().code(),
                name: param.name().to_owned(),
            })
            .collect(),
        // Manifest validation guarantees the id fits.
        function_id: i32::try_from(definition.id()).unwrap_or(i32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use sse_manifest::{DataType, FunctionType};

    use super::*;

    fn manifest() -> Arc<FunctionManifest> {
        Arc::new(
            FunctionManifest::new(vec![
                FunctionDefinition::new(0, "Predict", FunctionType::Scalar, DataType::String)
                    .with_param("player", DataType::String),
                FunctionDefinition::new(5, "Blend", FunctionType::Tensor, DataType::Dual)
                    .with_param("zeta", DataType::Numeric)
                    .with_param("alpha", DataType::String),
            ])
            .expect("valid manifest"),
        )
    }

    #[test]
    fn advertises_every_function_with_sorted_params() {
        let capabilities = CapabilityNegotiator::new(manifest()).capabilities();

        assert!(!capabilities.allow_script);
        assert_eq!(capabilities.plugin_identifier, PLUGIN_IDENTIFIER);
        assert_eq!(capabilities.functions.len(), 2);

        let blend = capabilities
            .functions
            .iter()
            .find(|function| function.function_id == 5)
            .expect("blend advertised");
        assert_eq!(blend.function_type, proto::FunctionType::Tensor as i32);
        assert_eq!(blend.return_type, proto::DataType::Dual as i32);
        let names: Vec<&str> = blend.params.iter().map(|param| param.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(blend.params[0].data_type, proto::DataType::String as i32);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let negotiator = CapabilityNegotiator::with_identity(manifest(), "test", "v9");
        assert_eq!(negotiator.capabilities(), negotiator.capabilities());
    }
}
