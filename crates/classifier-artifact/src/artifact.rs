// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The persisted classifier.
//!
//! A classifier is stored as a SafeTensors file. The header's free-form
//! metadata holds the estimator class name and its string-valued
//! hyper-parameters; the tensors hold the learned weights. For the linear
//! family that is `coef` (`[rows, n_features]`) and `intercept` (`[rows]`).
//!
//! ```text
//! __metadata__: {"estimator": "LogisticRegression", "multi_class": "auto"}
//! coef:         F64 [1, 384]
//! intercept:    F64 [1]
//! ```
//!
//! This crate does not judge whether an estimator is convertible; it only
//! reproduces what was persisted.

use crate::ArtifactError;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tensor_core::{DType, Shape, Tensor};

/// Metadata key naming the estimator class.
pub const ESTIMATOR_KEY: &str = "estimator";

/// A trained estimator as read from its native persistence format.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierArtifact {
    estimator: String,
    params: BTreeMap<String, String>,
    tensors: BTreeMap<String, Tensor>,
}

impl ClassifierArtifact {
    /// Creates an empty artifact for the named estimator class.
    pub fn new(estimator: impl Into<String>) -> Self {
        Self {
            estimator: estimator.into(),
            params: BTreeMap::new(),
            tensors: BTreeMap::new(),
        }
    }

    /// Adds a string hyper-parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds a named weight tensor.
    pub fn with_tensor(mut self, name: impl Into<String>, tensor: Tensor) -> Self {
        self.tensors.insert(name.into(), tensor);
        self
    }

    /// Estimator class name (e.g. `"LogisticRegression"`).
    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    /// Looks up a hyper-parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Looks up a weight tensor.
    pub fn tensor(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    /// Total number of learned scalars.
    pub fn num_parameters(&self) -> usize {
        self.tensors.values().map(|t| t.shape().num_elements()).sum()
    }

    /// Decodes an artifact from SafeTensors bytes.
    ///
    /// `origin` is only used in error messages.
    pub fn from_bytes(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        let corrupt = |detail: String| ArtifactError::CorruptArtifact {
            path: origin.to_path_buf(),
            detail,
        };

        let (_, header) = safetensors::SafeTensors::read_metadata(bytes)
            .map_err(|e| corrupt(format!("SafeTensors header: {e}")))?;
        let mut params: BTreeMap<String, String> = header
            .metadata()
            .as_ref()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let estimator = params
            .remove(ESTIMATOR_KEY)
            .ok_or_else(|| corrupt(format!("header metadata has no '{ESTIMATOR_KEY}' entry")))?;

        let st = safetensors::SafeTensors::deserialize(bytes)
            .map_err(|e| corrupt(format!("SafeTensors body: {e}")))?;

        let mut tensors = BTreeMap::new();
        for (name, view) in st.tensors() {
            let dtype = convert_safetensor_dtype(view.dtype())
                .ok_or_else(|| corrupt(format!("tensor '{name}' has unsupported dtype {:?}", view.dtype())))?;
            let tensor = Tensor::from_le_bytes(Shape::new(view.shape().to_vec()), dtype, view.data())
                .map_err(|e| corrupt(format!("tensor '{name}': {e}")))?;
            tensors.insert(name, tensor);
        }

        tracing::debug!(
            "decoded artifact '{}' with {} tensors, {} params",
            estimator,
            tensors.len(),
            params.len(),
        );

        Ok(Self {
            estimator,
            params,
            tensors,
        })
    }

    /// Encodes the artifact as SafeTensors bytes (`f32` tensors).
    pub fn to_bytes(&self) -> Result<Vec<u8>, safetensors::SafeTensorError> {
        let mut metadata: HashMap<String, String> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        metadata.insert(ESTIMATOR_KEY.to_string(), self.estimator.clone());

        let buffers: Vec<(String, Vec<usize>, Vec<u8>)> = self
            .tensors
            .iter()
            .map(|(name, t)| (name.clone(), t.shape().dims().to_vec(), t.to_le_bytes()))
            .collect();

        let mut views = Vec::with_capacity(buffers.len());
        for (name, shape, data) in &buffers {
            let view = safetensors::tensor::TensorView::new(
                safetensors::Dtype::F32,
                shape.clone(),
                data,
            )?;
            views.push((name.clone(), view));
        }

        safetensors::serialize(
            views.iter().map(|(name, view)| (name.as_str(), view)),
            &Some(metadata),
        )
    }

    /// Writes the artifact to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes().map_err(|e| ArtifactError::WriteFailed {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        })?;
        std::fs::write(path, bytes).map_err(|source| ArtifactError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// One-line description for logs and the CLI.
    pub fn summary(&self) -> String {
        let tensors: Vec<String> = self
            .tensors
            .iter()
            .map(|(name, t)| format!("{name}{}", t.shape()))
            .collect();
        format!(
            "{} ({} parameters: {})",
            self.estimator,
            self.num_parameters(),
            tensors.join(", "),
        )
    }
}

/// Maps a SafeTensors dtype onto the float types the loader accepts.
fn convert_safetensor_dtype(st_dtype: safetensors::Dtype) -> Option<DType> {
    match st_dtype {
        safetensors::Dtype::F32 => Some(DType::F32),
        safetensors::Dtype::F64 => Some(DType::F64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(features: usize) -> ClassifierArtifact {
        let coef: Vec<f32> = (0..features).map(|i| i as f32 * 0.01).collect();
        ClassifierArtifact::new("LogisticRegression")
            .with_param("multi_class", "auto")
            .with_tensor("coef", Tensor::from_vec(Shape::matrix(1, features), coef).unwrap())
            .with_tensor("intercept", Tensor::from_f32(Shape::vector(1), &[-0.5]).unwrap())
    }

    #[test]
    fn test_bytes_preserve_contents() {
        let artifact = logistic(16);
        let bytes = artifact.to_bytes().unwrap();
        let back = ClassifierArtifact::from_bytes(&bytes, Path::new("mem")).unwrap();

        assert_eq!(back.estimator(), "LogisticRegression");
        assert_eq!(back.param("multi_class"), Some("auto"));
        assert_eq!(back.param(ESTIMATOR_KEY), None);
        assert_eq!(back, artifact);
    }

    #[test]
    fn test_f64_tensors_are_narrowed() {
        let values = [0.5f64, -1.25];
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view =
            safetensors::tensor::TensorView::new(safetensors::Dtype::F64, vec![1, 2], &data).unwrap();
        let mut meta = HashMap::new();
        meta.insert(ESTIMATOR_KEY.to_string(), "RidgeClassifier".to_string());
        let bytes = safetensors::serialize(vec![("coef", &view)], &Some(meta)).unwrap();

        let artifact = ClassifierArtifact::from_bytes(&bytes, Path::new("mem")).unwrap();
        assert_eq!(artifact.tensor("coef").unwrap().as_slice(), &[0.5, -1.25]);
    }

    #[test]
    fn test_integer_tensors_are_corrupt() {
        let data = vec![0u8; 8];
        let view =
            safetensors::tensor::TensorView::new(safetensors::Dtype::I64, vec![1], &data).unwrap();
        let mut meta = HashMap::new();
        meta.insert(ESTIMATOR_KEY.to_string(), "LogisticRegression".to_string());
        let bytes = safetensors::serialize(vec![("coef", &view)], &Some(meta)).unwrap();

        let err = ClassifierArtifact::from_bytes(&bytes, Path::new("mem")).unwrap_err();
        assert!(matches!(err, ArtifactError::CorruptArtifact { .. }));
    }

    #[test]
    fn test_missing_estimator_is_corrupt() {
        let data = 1.0f32.to_le_bytes();
        let view =
            safetensors::tensor::TensorView::new(safetensors::Dtype::F32, vec![1], &data).unwrap();
        let bytes = safetensors::serialize(vec![("coef", &view)], &None).unwrap();

        let err = ClassifierArtifact::from_bytes(&bytes, Path::new("mem")).unwrap_err();
        assert!(err.to_string().contains("estimator"));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let err = ClassifierArtifact::from_bytes(b"not a safetensors file", Path::new("x")).unwrap_err();
        assert!(matches!(err, ArtifactError::CorruptArtifact { .. }));
    }

    #[test]
    fn test_summary() {
        let s = logistic(4).summary();
        assert!(s.starts_with("LogisticRegression"));
        assert!(s.contains("5 parameters"));
        assert!(s.contains("coef[1, 4]"));
    }
}
