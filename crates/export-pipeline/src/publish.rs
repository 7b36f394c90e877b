// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Descriptor publication.
//!
//! [`DescriptorUpdater::apply`] is a pure additive merge: it sets the three
//! calling-convention keys and leaves everything else alone, so applying it
//! twice yields the same record. [`DescriptorUpdater::persist`] replaces the
//! file atomically through a sibling temporary file.

use crate::PipelineError;
use classifier_artifact::{InputSpec, ModelDescriptor};
use std::io::Write;
use std::path::Path;

/// What the descriptor should advertise about the exported graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Graph location relative to the descriptor's directory.
    pub graph_location: String,
    pub input_name: String,
    pub input_shape: Vec<Option<usize>>,
}

impl Publication {
    /// Describes `graph_path` as seen from `descriptor_path`.
    pub fn new(graph_path: &Path, descriptor_path: &Path, spec: &InputSpec) -> Self {
        let base = descriptor_path.parent().unwrap_or_else(|| Path::new(""));
        let relative = graph_path.strip_prefix(base).unwrap_or(graph_path);
        Self {
            graph_location: relative.to_string_lossy().replace('\\', "/"),
            input_name: spec.name().to_string(),
            input_shape: spec.shape(),
        }
    }
}

pub struct DescriptorUpdater;

impl DescriptorUpdater {
    /// Returns `descriptor` with the publication merged in.
    pub fn apply(descriptor: &ModelDescriptor, publication: &Publication) -> ModelDescriptor {
        let mut updated = descriptor.clone();
        updated.onnx_model_path = Some(publication.graph_location.clone());
        updated.input_name = Some(publication.input_name.clone());
        updated.input_shape = Some(publication.input_shape.clone());
        updated
    }

    /// Writes `descriptor` to `path` as two-space-indented JSON.
    ///
    /// The file is first written to a temporary sibling and then renamed
    /// over `path`, so readers see either the old or the new record. An
    /// existing file's permissions carry over to the replacement.
    pub fn persist(descriptor: &ModelDescriptor, path: &Path) -> Result<(), PipelineError> {
        let json = descriptor.to_json_pretty().map_err(|e| {
            PipelineError::persistence(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let permissions = std::fs::metadata(path).ok().map(|m| m.permissions());

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| PipelineError::persistence(dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| match permissions {
                Some(permissions) => tmp.as_file().set_permissions(permissions),
                None => Ok(()),
            })
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| PipelineError::persistence(tmp.path(), e))?;
        tmp.persist(path)
            .map_err(|e| PipelineError::persistence(path, e.error))?;

        tracing::debug!("descriptor written to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::from_json(
            r#"{"model_name": "demo", "embedding_dim": 384, "classes": ["neg", "pos"],
                "accuracy": 0.91, "trained_at": "2024-05-01"}"#,
        )
        .unwrap()
    }

    fn publication() -> Publication {
        Publication::new(
            Path::new("/opt/app/models/classifier_model.onnx"),
            Path::new("/opt/app/models/model_metadata.json"),
            &InputSpec::new("float_input", 384),
        )
    }

    #[test]
    fn test_publication_relative_location() {
        let p = publication();
        assert_eq!(p.graph_location, "classifier_model.onnx");
        assert_eq!(p.input_shape, vec![None, Some(384)]);

        let nested = Publication::new(
            Path::new("/opt/app/models/onnx/graph.onnx"),
            Path::new("/opt/app/models/model_metadata.json"),
            &InputSpec::new("float_input", 4),
        );
        assert_eq!(nested.graph_location, "onnx/graph.onnx");
    }

    #[test]
    fn test_apply_is_additive() {
        let before = descriptor();
        let after = DescriptorUpdater::apply(&before, &publication());

        assert_eq!(after.onnx_model_path.as_deref(), Some("classifier_model.onnx"));
        assert_eq!(after.input_name.as_deref(), Some("float_input"));
        assert_eq!(after.input_shape, Some(vec![None, Some(384)]));
        assert_eq!(after.model_name, before.model_name);
        assert_eq!(after.classes, before.classes);
        assert_eq!(after.extra, before.extra);
    }

    #[test]
    fn test_apply_idempotent() {
        let once = DescriptorUpdater::apply(&descriptor(), &publication());
        let twice = DescriptorUpdater::apply(&once, &publication());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_persist_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_metadata.json");
        std::fs::write(&path, "{}").unwrap();

        let d = DescriptorUpdater::apply(&descriptor(), &publication());
        DescriptorUpdater::persist(&d, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"input_shape\": [\n    null,\n    384\n  ]"));
        assert!(text.ends_with('\n'));
        // Unknown keys keep their relative order.
        assert!(text.find("accuracy").unwrap() < text.find("trained_at").unwrap());
        assert_eq!(ModelDescriptor::from_json(&text).unwrap(), d);

        // No temporary files are left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_persist_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_metadata.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        DescriptorUpdater::persist(&descriptor(), &path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("model_metadata.json");
        assert!(matches!(
            DescriptorUpdater::persist(&descriptor(), &path),
            Err(PipelineError::Persistence { .. })
        ));
    }
}
