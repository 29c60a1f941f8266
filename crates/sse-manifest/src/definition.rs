//! Individual function and parameter declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DataType, FunctionType};

/// A named, typed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDefinition {
    name: String,
    data_type: DataType,
}

impl ParamDefinition {
    /// Creates a parameter declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Declared value type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }
}

/// Declaration of a single function the plugin offers.
///
/// Field names follow the manifest's PascalCase keys. `Params` is a JSON
/// object whose entry order is the declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionDefinition {
    name: String,
    id: u32,
    #[serde(rename = "Type")]
    function_type: FunctionType,
    return_type: DataType,
    #[serde(default, with = "params_map")]
    params: Vec<ParamDefinition>,
}

impl FunctionDefinition {
    /// Creates a function declaration without parameters.
    #[must_use]
    pub fn new(
        id: u32,
        name: impl Into<String>,
        function_type: FunctionType,
        return_type: DataType,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            function_type,
            return_type,
            params: Vec::new(),
        }
    }

    /// Appends a parameter, keeping declaration order.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.params.push(ParamDefinition::new(name, data_type));
        self
    }

    /// Function name as exposed to the host.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Identifier the host uses to invoke the function.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Invocation semantics.
    #[must_use]
    pub const fn function_type(&self) -> FunctionType {
        self.function_type
    }

    /// Declared return type.
    #[must_use]
    pub const fn return_type(&self) -> DataType {
        self.return_type
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamDefinition] {
        &self.params
    }

    /// Parameters sorted by name, the order used when advertising.
    #[must_use]
    pub fn params_by_name(&self) -> Vec<&ParamDefinition> {
        let mut sorted: Vec<&ParamDefinition> = self.params.iter().collect();
        sorted.sort_by(|left, right| left.name.cmp(&right.name));
        sorted
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}(", self.name, self.id)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.data_type)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// `Params` is an ordered JSON object rather than an array, so it needs a
/// hand-written visitor to keep entry order and reject repeated keys.
mod params_map {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::ParamDefinition;
    use crate::types::DataType;

    pub(super) fn serialize<S>(params: &[ParamDefinition], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(params.len()))?;
        for param in params {
            map.serialize_entry(param.name(), &param.data_type())?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ParamDefinition>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ParamsVisitor)
    }

    struct ParamsVisitor;

    impl<'de> Visitor<'de> for ParamsVisitor {
        type Value = Vec<ParamDefinition>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an object mapping parameter names to data types")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut params: Vec<ParamDefinition> =
                Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, data_type)) = access.next_entry::<String, DataType>()? {
                if params.iter().any(|existing| existing.name() == name) {
                    return Err(de::Error::custom(format!(
                        "parameter '{name}' is declared more than once"
                    )));
                }
                params.push(ParamDefinition::new(name, data_type));
            }
            Ok(params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_declaration_order() {
        let json = r#"{"Name":"Blend","Id":3,"Type":0,"ReturnType":1,
            "Params":{"zeta":1,"alpha":0,"mid":2}}"#;
        let definition: FunctionDefinition = serde_json::from_str(json).expect("parse");

        let names: Vec<&str> = definition.params().iter().map(ParamDefinition::name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);

        let sorted: Vec<&str> = definition
            .params_by_name()
            .into_iter()
            .map(ParamDefinition::name)
            .collect();
        assert_eq!(sorted, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn missing_params_means_no_arguments() {
        let json = r#"{"Name":"Ping","Id":1,"Type":"Scalar","ReturnType":"Numeric"}"#;
        let definition: FunctionDefinition = serde_json::from_str(json).expect("parse");
        assert_eq!(definition.arity(), 0);
        assert_eq!(definition.return_type(), DataType::Numeric);
    }

    #[test]
    fn repeated_parameter_is_rejected() {
        let json = r#"{"Name":"Twice","Id":2,"Type":0,"ReturnType":0,
            "Params":{"x":0,"x":1}}"#;
        let error = serde_json::from_str::<FunctionDefinition>(json).expect_err("must reject");
        assert!(error.to_string().contains("'x' is declared more than once"), "{error}");
    }

    #[test]
    fn display_renders_signature() {
        let definition = FunctionDefinition::new(0, "Predict", FunctionType::Scalar, DataType::String)
            .with_param("player", DataType::String);
        assert_eq!(definition.to_string(), "Predict#0(player: String) -> String");
    }

    #[test]
    fn serialises_with_manifest_keys() {
        let definition = FunctionDefinition::new(4, "Sum", FunctionType::Aggregation, DataType::Numeric)
            .with_param("value", DataType::Numeric);
        let json = serde_json::to_value(&definition).expect("serialise");
        assert_eq!(json["Type"], 1);
        assert_eq!(json["ReturnType"], 1);
        assert_eq!(json["Params"]["value"], 1);
    }
}
