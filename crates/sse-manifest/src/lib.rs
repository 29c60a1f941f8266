//! Declarative function manifest for the SSE prediction plugin.
//!
//! The manifest is the single source of truth for the functions a plugin
//! exposes to the analytics host: each entry names a function, fixes the
//! numeric identifier the host uses to invoke it, and declares its parameter
//! and return types. The daemon loads the manifest once during bootstrap and
//! shares it read-only between the capability negotiator and the dispatch
//! table.
//!
//! # Format
//!
//! The manifest is a JSON document with a single `Functions` array:
//!
//! ```json
//! {
//!   "Functions": [
//!     {
//!       "Name": "Predict",
//!       "Id": 0,
//!       "Type": 0,
//!       "ReturnType": 0,
//!       "Params": { "player": 0 }
//!     }
//!   ]
//! }
//! ```
//!
//! Type fields accept either the numeric SSE wire codes or their names
//! (`"Scalar"`, `"String"`, ...). Parameter declaration order is preserved.
//!
//! # Example
//!
//! ```
//! use sse_manifest::{DataType, FunctionManifest};
//!
//! let manifest = FunctionManifest::from_json(
//!     r#"{"Functions":[{"Name":"Predict","Id":0,"Type":0,"ReturnType":0,"Params":{"player":0}}]}"#,
//! )
//! .expect("manifest parses");
//! let predict = manifest.get(0).expect("function 0 is declared");
//! assert_eq!(predict.name(), "Predict");
//! assert_eq!(predict.params()[0].data_type(), DataType::String);
//! ```

pub mod definition;
pub mod error;
pub mod manifest;
pub mod types;

pub use self::definition::{FunctionDefinition, ParamDefinition};
pub use self::error::{ManifestError, UnknownTypeCode};
pub use self::manifest::FunctionManifest;
pub use self::types::{DataType, FunctionType};
