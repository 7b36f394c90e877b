// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Loading a classifier and its descriptor from disk.
//!
//! The classifier file is memory-mapped and decoded in one pass; the
//! descriptor is read as text. Nothing is written.

use crate::{ArtifactError, ClassifierArtifact, ModelDescriptor};
use std::path::Path;

/// Reads the pipeline's two inputs.
///
/// # Example
/// ```no_run
/// use classifier_artifact::ArtifactLoader;
/// use std::path::Path;
///
/// let (artifact, descriptor) = ArtifactLoader::load(
///     Path::new("models/classifier_model.safetensors"),
///     Path::new("models/model_metadata.json"),
/// ).unwrap();
/// println!("{} with {} classes", artifact.estimator(), descriptor.num_classes());
/// ```
pub struct ArtifactLoader;

impl ArtifactLoader {
    /// Loads the classifier and the descriptor.
    ///
    /// # Errors
    /// - [`ArtifactError::MissingArtifact`] if either path is not a readable file.
    /// - [`ArtifactError::CorruptArtifact`] if either file fails to deserialize.
    pub fn load(
        artifact_path: &Path,
        descriptor_path: &Path,
    ) -> Result<(ClassifierArtifact, ModelDescriptor), ArtifactError> {
        let artifact = Self::load_artifact(artifact_path)?;
        tracing::info!("loaded classifier: {}", artifact.summary());

        let descriptor = ModelDescriptor::from_file(descriptor_path)?;
        tracing::info!(
            "loaded descriptor '{}': embedding_dim={:?}, {} classes",
            descriptor.model_name,
            descriptor.embedding_dim,
            descriptor.num_classes(),
        );

        Ok((artifact, descriptor))
    }

    /// Memory-maps and decodes a SafeTensors classifier.
    pub fn load_artifact(path: &Path) -> Result<ClassifierArtifact, ArtifactError> {
        let missing = |detail: String| ArtifactError::MissingArtifact {
            path: path.to_path_buf(),
            detail,
        };

        if !path.is_file() {
            return Err(missing("not a file".into()));
        }

        let file = std::fs::File::open(path).map_err(|e| missing(e.to_string()))?;
        let len = file.metadata().map_err(|e| missing(e.to_string()))?.len();
        if len == 0 {
            return Err(ArtifactError::CorruptArtifact {
                path: path.to_path_buf(),
                detail: "file is empty".into(),
            });
        }

        // SAFETY: the mapping is read-only and dropped before this function
        // returns; the pipeline is the only process expected to touch the file.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| missing(format!("mmap failed: {e}")))?;

        tracing::debug!(
            "mapped '{}' ({:.2} KB)",
            path.display(),
            mmap.len() as f64 / 1024.0,
        );

        ClassifierArtifact::from_bytes(&mmap, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Shape, Tensor};

    fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let artifact_path = dir.join("classifier_model.safetensors");
        ClassifierArtifact::new("LogisticRegression")
            .with_tensor("coef", Tensor::zeros(Shape::matrix(1, 8)))
            .with_tensor("intercept", Tensor::zeros(Shape::vector(1)))
            .save(&artifact_path)
            .unwrap();

        let descriptor_path = dir.join("model_metadata.json");
        std::fs::write(
            &descriptor_path,
            r#"{"model_name": "demo", "embedding_dim": 8, "classes": ["neg", "pos"]}"#,
        )
        .unwrap();

        (artifact_path, descriptor_path)
    }

    #[test]
    fn test_load_both() {
        let dir = tempfile::tempdir().unwrap();
        let (a, d) = write_inputs(dir.path());

        let (artifact, descriptor) = ArtifactLoader::load(&a, &d).unwrap();
        assert_eq!(artifact.estimator(), "LogisticRegression");
        assert_eq!(artifact.tensor("coef").unwrap().shape(), &Shape::matrix(1, 8));
        assert_eq!(descriptor.model_name, "demo");
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let (_, d) = write_inputs(dir.path());

        let err = ArtifactLoader::load(&dir.path().join("absent.safetensors"), &d).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingArtifact { .. }));
    }

    #[test]
    fn test_missing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _) = write_inputs(dir.path());

        let err = ArtifactLoader::load(&a, &dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingArtifact { .. }));
    }

    #[test]
    fn test_empty_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let (a, d) = write_inputs(dir.path());
        std::fs::write(&a, b"").unwrap();

        let err = ArtifactLoader::load(&a, &d).unwrap_err();
        assert!(matches!(err, ArtifactError::CorruptArtifact { .. }));
    }

    #[test]
    fn test_truncated_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let (a, d) = write_inputs(dir.path());
        let bytes = std::fs::read(&a).unwrap();
        std::fs::write(&a, &bytes[..bytes.len() - 4]).unwrap();

        let err = ArtifactLoader::load(&a, &d).unwrap_err();
        assert!(matches!(err, ArtifactError::CorruptArtifact { .. }));
    }

    #[test]
    fn test_malformed_descriptor_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let (a, d) = write_inputs(dir.path());
        std::fs::write(&d, "model_name: demo").unwrap();

        let err = ArtifactLoader::load(&a, &d).unwrap_err();
        assert!(matches!(err, ArtifactError::CorruptArtifact { .. }));
    }
}
