use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use crate::decode::layout;

/// Numeric representation marker for a feature.
///
/// The on-disk schema stores a one-character marker per feature. Markers
/// other than `f` and `i` survive deserialization as [`FeatureKind::Other`]
/// so the decoder can skip them with a diagnostic instead of rejecting the
/// whole schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub enum FeatureKind {
    Float,
    Int,
    Other(char),
}

impl From<char> for FeatureKind {
    fn from(marker: char) -> Self {
        match marker {
            'f' => FeatureKind::Float,
            'i' => FeatureKind::Int,
            other => FeatureKind::Other(other),
        }
    }
}

impl From<FeatureKind> for char {
    fn from(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Float => 'f',
            FeatureKind::Int => 'i',
            FeatureKind::Other(marker) => marker,
        }
    }
}

impl FeatureKind {
    /// Whether the decoder knows how to read values of this kind.
    pub fn is_recognized(self) -> bool {
        matches!(self, FeatureKind::Float | FeatureKind::Int)
    }

    /// The single-character marker used in schema files.
    pub fn marker(self) -> char {
        char::from(self)
    }
}

/// One schema entry: feature name, numeric kind, encoded byte width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub name: String,
    pub kind: FeatureKind,
    /// Encoded width in bytes. The format stores 4-byte values for both
    /// recognized kinds; schema loading rejects anything else.
    #[serde(default = "default_width")]
    pub width: u32,
}

fn default_width() -> u32 {
    layout::VALUE_WIDTH as u32
}

impl FeatureDescriptor {
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            width: default_width(),
        }
    }
}

/// Ordered, validated feature schema.
///
/// List order defines the on-disk field order for every frame. An empty
/// schema is valid; the decoder reports it as a diagnostic, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    features: Vec<FeatureDescriptor>,
}

impl Schema {
    /// Validate a caller-supplied descriptor list.
    pub fn from_descriptors(features: Vec<FeatureDescriptor>) -> Result<Self, SchemaError> {
        for (index, descriptor) in features.iter().enumerate() {
            if descriptor.name.is_empty() {
                return Err(SchemaError::EmptyName { index });
            }
            if features[..index].iter().any(|d| d.name == descriptor.name) {
                return Err(SchemaError::DuplicateName {
                    name: descriptor.name.clone(),
                });
            }
            if descriptor.kind.is_recognized() && descriptor.width != default_width() {
                return Err(SchemaError::UnsupportedWidth {
                    name: descriptor.name.clone(),
                    width: descriptor.width,
                    expected: default_width(),
                });
            }
        }
        Ok(Self { features })
    }

    /// Parse and validate a JSON schema document.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        Self::from_descriptors(schema.features)
    }

    /// Load and validate a JSON schema file.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn descriptors(&self) -> &[FeatureDescriptor] {
        &self.features
    }

    pub fn into_descriptors(self) -> Vec<FeatureDescriptor> {
        self.features
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureDescriptor, FeatureKind, Schema};
    use crate::schema::error::SchemaError;

    #[test]
    fn parse_schema_json() {
        let json = r#"{
            "features": [
                { "name": "pitch", "kind": "f", "width": 4 },
                { "name": "energy", "kind": "i" }
            ]
        }"#;
        let schema = Schema::from_json_str(json).unwrap();
        let descriptors = schema.descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "pitch");
        assert_eq!(descriptors[0].kind, FeatureKind::Float);
        assert_eq!(descriptors[1].kind, FeatureKind::Int);
        assert_eq!(descriptors[1].width, 4);
    }

    #[test]
    fn unknown_marker_is_preserved() {
        let json = r#"{ "features": [ { "name": "label", "kind": "s" } ] }"#;
        let schema = Schema::from_json_str(json).unwrap();
        assert_eq!(schema.descriptors()[0].kind, FeatureKind::Other('s'));
        assert!(!schema.descriptors()[0].kind.is_recognized());
    }

    #[test]
    fn marker_round_trips() {
        for marker in ['f', 'i', 'x'] {
            assert_eq!(FeatureKind::from(marker).marker(), marker);
        }
    }

    #[test]
    fn empty_schema_is_valid() {
        let schema = Schema::from_json_str(r#"{ "features": [] }"#).unwrap();
        assert!(schema.descriptors().is_empty());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let descriptors = vec![
            FeatureDescriptor::new("pitch", FeatureKind::Float),
            FeatureDescriptor::new("pitch", FeatureKind::Int),
        ];
        let err = Schema::from_descriptors(descriptors).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName { name } if name == "pitch"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let descriptors = vec![FeatureDescriptor::new("", FeatureKind::Float)];
        let err = Schema::from_descriptors(descriptors).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyName { index: 0 }));
    }

    #[test]
    fn recognized_kind_rejects_other_widths() {
        let mut descriptor = FeatureDescriptor::new("pitch", FeatureKind::Float);
        descriptor.width = 8;
        let err = Schema::from_descriptors(vec![descriptor]).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedWidth { width: 8, .. }));
    }

    #[test]
    fn unrecognized_kind_allows_any_width() {
        let mut descriptor = FeatureDescriptor::new("label", FeatureKind::Other('s'));
        descriptor.width = 16;
        assert!(Schema::from_descriptors(vec![descriptor]).is_ok());
    }
}
