use super::kind::{InputKind, OutputKind};
use crate::collection::{ANY_COLLECTION_TYPE_DESCRIPTION, CollectionTypeDescription};
use crate::error::CollectionTypeError;
use serde::{Deserialize, Deserializer, Serialize};

/// How the host declares what an input consumes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    Dataset,
    DatasetCollection,
    Parameter,
}

/// Snapshot of one declared step input, as sent by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InputDeclaration {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub input_type: InputType,
    /// Acceptable bare shapes of a collection input. Empty means any collection.
    #[serde(default)]
    pub collection_types: Vec<String>,
    #[serde(default, rename = "type")]
    pub parameter_type: Option<String>,
}

/// Snapshot of one declared step output, as sent by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutputDeclaration {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub collection_type: Option<String>,
    /// Name of the input the collection shape is derived from at runtime.
    #[serde(default)]
    pub collection_type_source: Option<String>,
    #[serde(default)]
    pub parameter: bool,
    #[serde(default, rename = "type")]
    pub parameter_type: Option<String>,
    #[serde(default)]
    pub force_datatype: Option<String>,
}

impl InputDeclaration {
    pub fn data(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            optional: false,
            multiple: false,
            input_type: InputType::Dataset,
            collection_types: Vec::new(),
            parameter_type: None,
        }
    }

    pub fn collection(name: &str, extensions: &[&str], collection_types: &[&str]) -> Self {
        Self {
            input_type: InputType::DatasetCollection,
            collection_types: collection_types.iter().map(|c| c.to_string()).collect(),
            ..Self::data(name, extensions)
        }
    }

    pub fn parameter(name: &str, parameter_type: &str) -> Self {
        Self {
            input_type: InputType::Parameter,
            parameter_type: Some(parameter_type.to_string()),
            ..Self::data(name, &[])
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Resolves the declared kind, parsing any collection types.
    pub fn kind(&self) -> Result<InputKind, CollectionTypeError> {
        Ok(match self.input_type {
            InputType::Dataset => InputKind::Data,
            InputType::DatasetCollection => {
                let collection_types = if self.collection_types.is_empty() {
                    vec![ANY_COLLECTION_TYPE_DESCRIPTION]
                } else {
                    self.collection_types
                        .iter()
                        .map(|c| CollectionTypeDescription::new(c))
                        .collect::<Result<Vec<_>, _>>()?
                };
                InputKind::Collection { collection_types }
            }
            InputType::Parameter => InputKind::Parameter {
                parameter_type: self.parameter_type.clone().unwrap_or_default(),
            },
        })
    }

    /// Collection inputs and parameters never accept more than one connection.
    pub(crate) fn effective_multiple(&self) -> bool {
        self.multiple && self.input_type == InputType::Dataset
    }
}

impl OutputDeclaration {
    pub fn data(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            optional: false,
            collection: false,
            collection_type: None,
            collection_type_source: None,
            parameter: false,
            parameter_type: None,
            force_datatype: None,
        }
    }

    pub fn collection(name: &str, extensions: &[&str], collection_type: &str) -> Self {
        Self {
            collection: true,
            collection_type: Some(collection_type.to_string()),
            ..Self::data(name, extensions)
        }
    }

    pub fn parameter(name: &str, parameter_type: &str) -> Self {
        Self {
            parameter: true,
            parameter_type: Some(parameter_type.to_string()),
            ..Self::data(name, &[])
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_force_datatype(mut self, datatype: &str) -> Self {
        self.force_datatype = Some(datatype.to_string());
        self
    }

    /// Resolves the declared kind. A collection without an explicit type is
    /// treated as `Any`.
    pub fn kind(&self) -> Result<OutputKind, CollectionTypeError> {
        if self.collection {
            let collection_type = match &self.collection_type {
                Some(collection_type) => CollectionTypeDescription::new(collection_type)?,
                None => {
                    if self.collection_type_source.is_none() {
                        log::warn!(
                            "Output collection '{}' declares neither a collection type nor a collection type source",
                            self.name
                        );
                    }
                    ANY_COLLECTION_TYPE_DESCRIPTION
                }
            };
            Ok(OutputKind::Collection { collection_type })
        } else if self.parameter {
            Ok(OutputKind::Parameter {
                parameter_type: self.parameter_type.clone().unwrap_or_default(),
            })
        } else {
            Ok(OutputKind::Data)
        }
    }
}

/// Accepts either a single string or a list of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}
