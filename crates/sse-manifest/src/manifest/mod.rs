//! Loading and validation of the manifest document.


use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::FunctionDefinition;
use crate::error::ManifestError;

const INLINE_ORIGIN: &str = "<inline>";

/// The validated set of functions a plugin advertises.
///
/// Construction always validates, so a `FunctionManifest` in hand is
/// guaranteed to be non-empty with unique ids and names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionManifest {
    #[serde(rename = "Functions")]
    functions: Vec<FunctionDefinition>,
}

impl FunctionManifest {
    /// Builds a manifest from declarations.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the declarations violate an invariant.
    pub fn new(functions: Vec<FunctionDefinition>) -> Result<Self, ManifestError> {
        let manifest = Self { functions };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads, parses, and validates the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] when the file cannot be read, and the
    /// parse or validation variants otherwise.
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        let manifest = Self::parse(&contents, path.as_str())?;
        debug!(
            path = %path,
            functions = manifest.len(),
            "loaded function manifest"
        );
        Ok(manifest)
    }

    /// Parses and validates an in-memory manifest document.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] for malformed JSON and the validation
    /// variants for well-formed but inconsistent documents.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Self::parse(json, INLINE_ORIGIN)
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ManifestError> {
        let manifest: Self =
            serde_json::from_str(json).map_err(|source| ManifestError::Parse {
                origin: origin.to_owned(),
                source: Arc::new(source),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Checks the manifest invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in declaration order.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.functions.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut ids: HashMap<u32, &str> = HashMap::with_capacity(self.functions.len());
        let mut names: HashMap<String, u32> = HashMap::with_capacity(self.functions.len());
        for function in &self.functions {
            let id = function.id();
            if i32::try_from(id).is_err() {
                return Err(ManifestError::IdOutOfRange { id });
            }
            if function.name().trim().is_empty() {
                return Err(ManifestError::BlankName { id });
            }
            if function.params().iter().any(|param| param.name().trim().is_empty()) {
                return Err(ManifestError::BlankParameter {
                    function: function.name().to_owned(),
                });
            }
            if let Some(first) = ids.insert(id, function.name()) {
                return Err(ManifestError::DuplicateId {
                    id,
                    first: first.to_owned(),
                    second: function.name().to_owned(),
                });
            }
            if names
                .insert(function.name().to_ascii_lowercase(), id)
                .is_some()
            {
                return Err(ManifestError::DuplicateName {
                    name: function.name().to_owned(),
                });
            }
        }
        Ok(())
    }

    /// All declarations in document order.
    #[must_use]
    pub fn functions(&self) -> &[FunctionDefinition] {
        &self.functions
    }

    /// Looks up a declaration by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&FunctionDefinition> {
        self.functions.iter().find(|function| function.id() == id)
    }

    /// Looks up a declaration by name, ignoring ASCII case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions
            .iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    /// Iterates over the declared ids.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.functions.iter().map(FunctionDefinition::id)
    }

    /// Number of declared functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Always `false` for a validated manifest; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
