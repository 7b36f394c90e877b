// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON model descriptor (`model_metadata.json`).
//!
//! # Format
//! ```json
//! {
//!   "model_name": "demo",
//!   "embedding_dim": 384,
//!   "classes": ["neg", "pos"],
//!   "onnx_model_path": "classifier_model.onnx",
//!   "input_name": "float_input",
//!   "input_shape": [null, 384]
//! }
//! ```
//!
//! The last three keys only appear after a successful export. Any other key
//! written by the training side is kept in [`ModelDescriptor::extra`]. A
//! parsed descriptor remembers its key order; writing it back keeps every
//! existing key where it was and appends new ones.

use crate::ArtifactError;
use std::path::Path;

/// The descriptor record consumed and updated by the export pipeline.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelDescriptor {
    /// Human-readable model name.
    pub model_name: String,
    /// Feature width the classifier was trained on.
    ///
    /// Kept optional and signed so that absent, zero and negative values
    /// parse and can be reported as an invalid descriptor rather than as a
    /// syntax error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_dim: Option<i64>,
    /// Class labels in output-index order.
    pub classes: Vec<String>,
    /// Graph file name, relative to the descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onnx_model_path: Option<String>,
    /// Name of the graph's input tensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_name: Option<String>,
    /// Input shape; `null` marks the dynamic batch dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<Vec<Option<usize>>>,
    /// Keys this pipeline does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Top-level key order of the parsed document.
    #[serde(skip)]
    key_order: Vec<String>,
}

// Equality is over content; key order only affects presentation.
impl PartialEq for ModelDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.model_name == other.model_name
            && self.embedding_dim == other.embedding_dim
            && self.classes == other.classes
            && self.onnx_model_path == other.onnx_model_path
            && self.input_name == other.input_name
            && self.input_shape == other.input_shape
            && self.extra == other.extra
    }
}

impl ModelDescriptor {
    /// Creates a descriptor with the three required fields.
    pub fn new(model_name: impl Into<String>, embedding_dim: i64, classes: Vec<String>) -> Self {
        Self {
            model_name: model_name.into(),
            embedding_dim: Some(embedding_dim),
            classes,
            onnx_model_path: None,
            input_name: None,
            input_shape: None,
            extra: serde_json::Map::new(),
            key_order: Vec::new(),
        }
    }

    /// Loads a descriptor from a JSON file.
    ///
    /// Unreadable paths map to [`ArtifactError::MissingArtifact`]; anything
    /// that is not a descriptor-shaped JSON document maps to
    /// [`ArtifactError::CorruptArtifact`].
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        if !path.is_file() {
            return Err(ArtifactError::MissingArtifact {
                path: path.to_path_buf(),
                detail: "not a file".into(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => ArtifactError::CorruptArtifact {
                path: path.to_path_buf(),
                detail: format!("descriptor is not UTF-8: {e}"),
            },
            _ => ArtifactError::MissingArtifact {
                path: path.to_path_buf(),
                detail: e.to_string(),
            },
        })?;

        Self::from_json(&content).map_err(|e| ArtifactError::CorruptArtifact {
            path: path.to_path_buf(),
            detail: format!("descriptor JSON: {e}"),
        })
    }

    /// Parses a descriptor from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let key_order = match &value {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        let mut descriptor: Self = serde_json::from_value(value)?;
        descriptor.key_order = key_order;
        Ok(descriptor)
    }

    /// Serializes the descriptor as 2-space indented JSON with a trailing
    /// newline, in the key order it was parsed with.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let value = match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => serde_json::Value::Object(self.in_parsed_order(map)),
            other => other,
        };
        let mut out = serde_json::to_string_pretty(&value)?;
        out.push('\n');
        Ok(out)
    }

    fn in_parsed_order(
        &self,
        fresh: serde_json::Map<String, serde_json::Value>,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut ordered = serde_json::Map::new();
        for key in &self.key_order {
            if let Some(value) = fresh.get(key) {
                ordered.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in fresh {
            if !ordered.contains_key(&key) {
                ordered.insert(key, value);
            }
        }
        ordered
    }

    /// Number of output classes.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"{
        "model_name": "demo",
        "embedding_dim": 384,
        "classes": ["neg", "pos"],
        "accuracy": 0.91,
        "trained_on": {"rows": 1200, "source": "fake-data"}
    }"#;

    #[test]
    fn test_parse_required_fields() {
        let d = ModelDescriptor::from_json(DEMO).unwrap();
        assert_eq!(d.model_name, "demo");
        assert_eq!(d.embedding_dim, Some(384));
        assert_eq!(d.classes, vec!["neg", "pos"]);
        assert_eq!(d.num_classes(), 2);
        assert!(d.onnx_model_path.is_none());
    }

    #[test]
    fn test_unknown_keys_survive_in_order() {
        let d = ModelDescriptor::from_json(DEMO).unwrap();
        let keys: Vec<_> = d.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, ["accuracy", "trained_on"]);

        let json = d.to_json_pretty().unwrap();
        let back = ModelDescriptor::from_json(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_rewrite_keeps_key_positions() {
        let d = ModelDescriptor::from_json(
            r#"{"model_name": "demo", "notes": "v2", "embedding_dim": 4, "classes": ["a", "b"]}"#,
        )
        .unwrap();
        let mut published = d.clone();
        published.input_name = Some("float_input".into());

        let json = published.to_json_pretty().unwrap();
        let positions: Vec<_> = ["model_name", "notes", "embedding_dim", "classes", "input_name"]
            .iter()
            .map(|k| json.find(&format!("\"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn test_missing_embedding_dim_still_parses() {
        let d = ModelDescriptor::from_json(r#"{"model_name": "m", "classes": ["a", "b"]}"#).unwrap();
        assert_eq!(d.embedding_dim, None);
    }

    #[test]
    fn test_negative_embedding_dim_still_parses() {
        let d = ModelDescriptor::from_json(
            r#"{"model_name": "m", "embedding_dim": -4, "classes": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(d.embedding_dim, Some(-4));
    }

    #[test]
    fn test_missing_classes_is_an_error() {
        assert!(ModelDescriptor::from_json(r#"{"model_name": "m", "embedding_dim": 3}"#).is_err());
    }

    #[test]
    fn test_published_fields_serialize_null_batch() {
        let mut d = ModelDescriptor::new("demo", 384, vec!["neg".into(), "pos".into()]);
        d.onnx_model_path = Some("classifier_model.onnx".into());
        d.input_name = Some("float_input".into());
        d.input_shape = Some(vec![None, Some(384)]);

        let json = d.to_json_pretty().unwrap();
        assert!(json.contains("\"input_shape\": [\n    null,\n    384\n  ]"));
        assert!(json.ends_with("}\n"));
        let back = ModelDescriptor::from_json(&json).unwrap();
        assert_eq!(back.input_shape, d.input_shape);
    }

    #[test]
    fn test_unpublished_fields_are_omitted() {
        let d = ModelDescriptor::new("demo", 8, vec!["a".into(), "b".into()]);
        let json = d.to_json_pretty().unwrap();
        assert!(!json.contains("onnx_model_path"));
        assert!(!json.contains("input_shape"));
    }

    #[test]
    fn test_from_file_classifies_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope.json");
        assert!(matches!(
            ModelDescriptor::from_file(&missing),
            Err(ArtifactError::MissingArtifact { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"model_name\": \"demo\",").unwrap();
        assert!(matches!(
            ModelDescriptor::from_file(&broken),
            Err(ArtifactError::CorruptArtifact { .. })
        ));

        assert!(matches!(
            ModelDescriptor::from_file(dir.path()),
            Err(ArtifactError::MissingArtifact { .. })
        ));
    }
}
