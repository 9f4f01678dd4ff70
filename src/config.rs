use crate::error::ConfigError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Tunable acceptance policy for a workflow editor.
///
/// Every field has a default, so a host only needs to supply the keys it
/// wants to override:
///
/// ```rust
/// use terminus::config::EditorConfig;
///
/// let config = EditorConfig::from_json(r#"{ "universal_input_datatype": "any" }"#).unwrap();
/// assert_eq!(config.universal_input_datatype, "any");
/// assert!(config.wildcard_output_datatypes.contains(&"_sniff_".to_string()));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// An input declaring this datatype accepts any data output.
    pub universal_input_datatype: String,
    /// Output datatypes whose concrete type is only known at runtime.
    pub wildcard_output_datatypes: Vec<String>,
    /// Parameter type names that compare equal after aliasing.
    pub parameter_type_aliases: AHashMap<String, String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let parameter_type_aliases = [
            ("integer", "int"),
            ("text", "string"),
            ("float", "float"),
            ("boolean", "boolean"),
            ("color", "string"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            universal_input_datatype: "input".to_string(),
            wildcard_output_datatypes: vec![
                "input".to_string(),
                "_sniff_".to_string(),
                "input_collection".to_string(),
            ],
            parameter_type_aliases,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::JsonParseError(e.to_string()))
    }

    /// Resolves a parameter type through the alias table.
    pub fn effective_parameter_type<'a>(&'a self, parameter_type: &'a str) -> &'a str {
        self.parameter_type_aliases
            .get(parameter_type)
            .map(String::as_str)
            .unwrap_or(parameter_type)
    }

    pub(crate) fn is_wildcard_output(&self, datatype: &str) -> bool {
        self.wildcard_output_datatypes.iter().any(|d| d == datatype)
    }
}
