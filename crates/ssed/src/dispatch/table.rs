//! Static mapping from function id to handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sse_manifest::{FunctionDefinition, FunctionManifest};
use thiserror::Error;

use crate::functions::{FunctionHandler, HandlerCatalogue, HandlerDeps};

use super::errors::CallError;

/// Raised when the manifest names a function no handler implements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchBuildError {
    /// The catalogue has no constructor for a declared function.
    #[error("no handler is registered for function '{name}' (id {id})")]
    MissingHandler {
        /// Declared id.
        id: u32,
        /// Declared name.
        name: String,
    },
}

/// A resolved function: its declaration and the handler running it.
#[derive(Clone)]
pub struct DispatchEntry {
    definition: FunctionDefinition,
    handler: Arc<dyn FunctionHandler>,
}

impl DispatchEntry {
    /// The manifest declaration.
    #[must_use]
    pub fn definition(&self) -> &FunctionDefinition {
        &self.definition
    }

    /// The handler instance.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn FunctionHandler> {
        &self.handler
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Read-only table consulted by every execution call.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: HashMap<u32, DispatchEntry>,
}

impl DispatchTable {
    /// Builds the table, constructing one handler per manifest entry.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchBuildError::MissingHandler`] for the first declared
    /// function the catalogue cannot construct.
    pub fn build(
        manifest: &FunctionManifest,
        catalogue: &HandlerCatalogue,
        deps: &HandlerDeps,
    ) -> Result<Self, DispatchBuildError> {
        let entries = manifest
            .functions()
            .iter()
            .map(|definition| {
                let handler = catalogue.construct(definition.name(), deps).ok_or_else(|| {
                    DispatchBuildError::MissingHandler {
                        id: definition.id(),
                        name: definition.name().to_owned(),
                    }
                })?;
                let entry = DispatchEntry {
                    definition: definition.clone(),
                    handler,
                };
                Ok((definition.id(), entry))
            })
            .collect::<Result<HashMap<_, _>, DispatchBuildError>>()?;
        Ok(Self { entries })
    }

    /// Resolves `id` to its entry.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownFunction`] when no function has that id.
    pub fn resolve(&self, id: u32) -> Result<&DispatchEntry, CallError> {
        self.entries
            .get(&id)
            .ok_or_else(|| CallError::unknown_function(id))
    }

    /// Number of dispatchable functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is dispatchable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
