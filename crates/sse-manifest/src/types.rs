//! Function and data type enumerations shared with the wire protocol.
//!
//! Discriminants match the SSE protocol codes so manifests written for other
//! SSE plugins load unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTypeCode;

/// Raw representation accepted for type fields: a wire code or a name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeCode {
    Code(i64),
    Name(String),
}

/// Value type of a parameter or return value.
///
/// # Example
///
/// ```
/// use sse_manifest::DataType;
///
/// assert_eq!(DataType::Dual.code(), 2);
/// assert_eq!(DataType::from_name("numeric"), Some(DataType::Numeric));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TypeCode", into = "i32")]
pub enum DataType {
    /// Text values.
    String,
    /// Numeric values.
    Numeric,
    /// Values carrying both a numeric and a text representation.
    Dual,
}

impl DataType {
    /// Returns the SSE wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::String => 0,
            Self::Numeric => 1,
            Self::Dual => 2,
        }
    }

    /// Looks up a type by wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::String),
            1 => Some(Self::Numeric),
            2 => Some(Self::Dual),
            _ => None,
        }
    }

    /// Looks up a type by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::String, Self::Numeric, Self::Dual]
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Numeric => "Numeric",
            Self::Dual => "Dual",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DataType> for i32 {
    fn from(value: DataType) -> Self {
        value.code()
    }
}

impl TryFrom<TypeCode> for DataType {
    type Error = UnknownTypeCode;

    fn try_from(raw: TypeCode) -> Result<Self, Self::Error> {
        match raw {
            TypeCode::Code(code) => {
                Self::from_code(code).ok_or_else(|| UnknownTypeCode::new("data type", code.to_string()))
            }
            TypeCode::Name(name) => {
                Self::from_name(&name).ok_or_else(|| UnknownTypeCode::new("data type", name))
            }
        }
    }
}

/// Invocation semantics of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TypeCode", into = "i32")]
pub enum FunctionType {
    /// One output row per input row (or per call for batch handlers).
    Scalar,
    /// Many input rows reduce to one output value.
    Aggregation,
    /// Table in, table out.
    Tensor,
}

impl FunctionType {
    /// Returns the SSE wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Scalar => 0,
            Self::Aggregation => 1,
            Self::Tensor => 2,
        }
    }

    /// Looks up a function type by wire code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Scalar),
            1 => Some(Self::Aggregation),
            2 => Some(Self::Tensor),
            _ => None,
        }
    }

    /// Looks up a function type by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Scalar, Self::Aggregation, Self::Tensor]
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Aggregation => "Aggregation",
            Self::Tensor => "Tensor",
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FunctionType> for i32 {
    fn from(value: FunctionType) -> Self {
        value.code()
    }
}

impl TryFrom<TypeCode> for FunctionType {
    type Error = UnknownTypeCode;

    fn try_from(raw: TypeCode) -> Result<Self, Self::Error> {
        match raw {
            TypeCode::Code(code) => Self::from_code(code)
                .ok_or_else(|| UnknownTypeCode::new("function type", code.to_string())),
            TypeCode::Name(name) => {
                Self::from_name(&name).ok_or_else(|| UnknownTypeCode::new("function type", name))
            }
        }
    }
}
