use super::compatibility::DatatypeCompatibility;
use crate::error::DatatypeError;
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};

/// A precomputed datatype hierarchy in the host's mapping format.
///
/// `ext_to_class_name` maps a datatype extension (`"txt"`) to its class
/// (`"galaxy.datatypes.data.Text"`); `class_to_classes` maps every class to
/// the set of classes it derives from, itself included.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DatatypesMapping {
    #[serde(default)]
    pub ext_to_class_name: AHashMap<String, String>,
    #[serde(default)]
    pub class_to_classes: AHashMap<String, AHashMap<String, bool>>,
}

impl DatatypesMapping {
    /// Parses the mapping from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, DatatypeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the mapping in the compact binary form hosts cache between sessions.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DatatypeError> {
        encode_to_vec(self, standard())
            .map_err(|e| DatatypeError::Encoding(format!("Serialization failed: {}", e)))
    }

    /// Decodes a mapping previously produced by [`DatatypesMapping::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatatypeError> {
        decode_from_slice(bytes, standard())
            .map(|(mapping, _)| mapping)
            .map_err(|e| DatatypeError::Encoding(format!("Deserialization failed: {}", e)))
    }

    /// Registers `extension` as an instance of `class_name` deriving from `ancestors`.
    pub fn with_datatype(mut self, extension: &str, class_name: &str, ancestors: &[&str]) -> Self {
        self.ext_to_class_name
            .insert(extension.to_string(), class_name.to_string());
        let classes = self
            .class_to_classes
            .entry(class_name.to_string())
            .or_default();
        classes.insert(class_name.to_string(), true);
        for ancestor in ancestors {
            classes.insert(ancestor.to_string(), true);
        }
        self
    }
}

impl DatatypeCompatibility for DatatypesMapping {
    fn is_subtype(&self, child: &str, parent: &str) -> bool {
        if child == parent {
            return true;
        }
        let (Some(child_class), Some(parent_class)) = (
            self.ext_to_class_name.get(child),
            self.ext_to_class_name.get(parent),
        ) else {
            return false;
        };
        self.class_to_classes
            .get(child_class)
            .and_then(|ancestors| ancestors.get(parent_class))
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING_JSON: &str = r#"{
        "ext_to_class_name": {
            "data": "galaxy.datatypes.data.Data",
            "txt": "galaxy.datatypes.data.Text",
            "tabular": "galaxy.datatypes.tabular.Tabular",
            "binary": "galaxy.datatypes.binary.Binary"
        },
        "class_to_classes": {
            "galaxy.datatypes.data.Data": {"galaxy.datatypes.data.Data": true},
            "galaxy.datatypes.data.Text": {
                "galaxy.datatypes.data.Text": true,
                "galaxy.datatypes.data.Data": true
            },
            "galaxy.datatypes.tabular.Tabular": {
                "galaxy.datatypes.tabular.Tabular": true,
                "galaxy.datatypes.data.Text": true,
                "galaxy.datatypes.data.Data": true
            },
            "galaxy.datatypes.binary.Binary": {
                "galaxy.datatypes.binary.Binary": true,
                "galaxy.datatypes.data.Data": true
            }
        }
    }"#;

    #[test]
    fn subtypes_follow_class_ancestry() {
        let mapping = DatatypesMapping::from_json(MAPPING_JSON).unwrap();
        assert!(mapping.is_subtype("tabular", "txt"));
        assert!(mapping.is_subtype("txt", "data"));
        assert!(!mapping.is_subtype("txt", "tabular"));
        assert!(!mapping.is_subtype("binary", "txt"));
    }

    #[test]
    fn unknown_extensions_only_match_themselves() {
        let mapping = DatatypesMapping::default();
        assert!(mapping.is_subtype("bam", "bam"));
        assert!(!mapping.is_subtype("bam", "sam"));
    }

    #[test]
    fn forced_datatype_participates_in_compatibility() {
        let mapping = DatatypesMapping::from_json(MAPPING_JSON).unwrap();
        let candidates = vec!["binary".to_string()];
        let required = vec!["txt".to_string()];
        assert!(!mapping.is_compatible(&candidates, &required, None));
        assert!(mapping.is_compatible(&candidates, &required, Some("tabular")));
    }

    #[test]
    fn binary_cache_preserves_hierarchy() {
        let mapping = DatatypesMapping::from_json(MAPPING_JSON).unwrap();
        let bytes = mapping.to_bytes().unwrap();
        let restored = DatatypesMapping::from_bytes(&bytes).unwrap();
        assert!(restored.is_subtype("tabular", "data"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = DatatypesMapping::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("datatypes mapping"));
    }
}
