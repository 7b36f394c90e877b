// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Post-export validation of a persisted graph.
//!
//! The graph is reloaded from disk into an [`ExecutionBackend`] and run on a
//! synthetic row drawn uniformly from `[0, 1)`. The run must produce a first
//! output of shape `[1, k]` whose argmax is a valid class index and, when a
//! label output is present, agrees with it.
//!
//! With a parity tolerance configured, a seeded batch is also compared
//! against the native [`LinearModel`].

use crate::backend::{BackendError, BackendOutput, ExecutionBackend, OutputData};
use classifier_artifact::InputSpec;
use graph_converter::LinearModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tensor_core::Tensor;

/// Rows compared in the parity check.
pub const PARITY_BATCH: usize = 8;

/// Seed for the parity batch when no validation seed is configured.
const PARITY_SEED: u64 = 0x5eed;

/// The graph did not honour its contract.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{backend}: {source}")]
    Backend {
        backend: String,
        #[source]
        source: BackendError,
    },

    #[error("graph produced no outputs")]
    NoOutputs,

    #[error("first output has shape {actual:?}, expected {expected:?}")]
    OutputShape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("first output is not a float tensor")]
    OutputType,

    #[error("predicted class index {index} is outside [0, {classes})")]
    IndexOutOfRange { index: usize, classes: usize },

    #[error("label output {label} disagrees with argmax {argmax} of the first output")]
    LabelMismatch { label: i64, argmax: usize },

    #[error("graph deviates from the native model by {deviation:e} (tolerance {tolerance:e})")]
    Parity { deviation: f32, tolerance: f32 },

    #[error("native reference failed: {0}")]
    Reference(#[from] tensor_core::TensorError),
}

/// What a successful smoke inference observed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationResult {
    pub input_shape: Vec<usize>,
    pub output_shape: Vec<usize>,
    pub predicted_class_index: usize,
    /// Largest absolute deviation from the native model, if checked.
    pub parity_deviation: Option<f32>,
}

/// Runs persisted graphs through a backend and checks their contract.
pub struct GraphValidator {
    backend: Box<dyn ExecutionBackend>,
    seed: Option<u64>,
}

impl GraphValidator {
    pub fn new(backend: Box<dyn ExecutionBackend>) -> Self {
        Self {
            backend,
            seed: None,
        }
    }

    /// Fixes the synthetic input; entropy is used otherwise.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Smoke-tests the graph at `graph_path` with one synthetic row.
    pub fn validate(
        &self,
        graph_path: &Path,
        spec: &InputSpec,
        n_classes: usize,
    ) -> Result<ValidationResult, ValidationError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let input = random_rows(&mut rng, 1, spec.features());
        let outputs = self.run(graph_path, &input)?;

        let first = outputs.first().ok_or(ValidationError::NoOutputs)?;
        let expected = vec![1, n_classes];
        if first.shape != expected {
            return Err(ValidationError::OutputShape {
                expected,
                actual: first.shape.clone(),
            });
        }
        let columns = first.to_tensor().ok_or(ValidationError::OutputType)?;
        let index = columns.argmax_rows()?[0];
        if index >= n_classes {
            return Err(ValidationError::IndexOutOfRange {
                index,
                classes: n_classes,
            });
        }

        if let Some(BackendOutput {
            data: OutputData::Int(labels),
            ..
        }) = outputs.get(1)
        {
            if let Some(&label) = labels.first() {
                if label != index as i64 {
                    return Err(ValidationError::LabelMismatch {
                        label,
                        argmax: index,
                    });
                }
            }
        }

        tracing::info!(
            "{} smoke run: input {:?} -> output {:?}, class {index}",
            self.backend.name(),
            input.shape().dims(),
            first.shape,
        );

        Ok(ValidationResult {
            input_shape: input.shape().dims().to_vec(),
            output_shape: first.shape.clone(),
            predicted_class_index: index,
            parity_deviation: None,
        })
    }

    /// Compares the graph with the native model on a seeded batch and
    /// returns the largest absolute deviation.
    pub fn check_parity(
        &self,
        graph_path: &Path,
        model: &LinearModel,
        tolerance: f32,
    ) -> Result<f32, ValidationError> {
        let mut rng = StdRng::seed_from_u64(self.seed.unwrap_or(PARITY_SEED));
        let input = random_rows(&mut rng, PARITY_BATCH, model.n_features());

        let expected = model.predict_proba(&input)?;
        let outputs = self.run(graph_path, &input)?;
        let actual = outputs
            .first()
            .ok_or(ValidationError::NoOutputs)?
            .to_tensor()
            .ok_or(ValidationError::OutputType)?;

        let deviation =
            actual
                .max_abs_diff(&expected)
                .ok_or_else(|| ValidationError::OutputShape {
                    expected: expected.shape().dims().to_vec(),
                    actual: actual.shape().dims().to_vec(),
                })?;

        tracing::debug!("parity over {PARITY_BATCH} rows: max deviation {deviation:e}");
        if deviation > tolerance {
            return Err(ValidationError::Parity {
                deviation,
                tolerance,
            });
        }
        Ok(deviation)
    }

    fn run(&self, graph_path: &Path, input: &Tensor) -> Result<Vec<BackendOutput>, ValidationError> {
        self.backend
            .run(graph_path, input)
            .map_err(|source| ValidationError::Backend {
                backend: self.backend.name().to_string(),
                source,
            })
    }
}

fn random_rows(rng: &mut StdRng, rows: usize, features: usize) -> Tensor {
    let mut t = Tensor::zeros(tensor_core::Shape::matrix(rows, features));
    t.as_mut_slice().iter_mut().for_each(|v| *v = rng.gen::<f32>());
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Backend that returns canned outputs and records the inputs it saw.
    struct Canned {
        outputs: Vec<BackendOutput>,
        seen: Mutex<Vec<Vec<usize>>>,
    }

    impl Canned {
        fn new(outputs: Vec<BackendOutput>) -> Box<Self> {
            Box::new(Self {
                outputs,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl ExecutionBackend for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn run(&self, _: &Path, input: &Tensor) -> Result<Vec<BackendOutput>, BackendError> {
            self.seen.lock().unwrap().push(input.shape().dims().to_vec());
            Ok(self.outputs.clone())
        }
    }

    fn probs(values: Vec<f32>) -> BackendOutput {
        BackendOutput {
            shape: vec![1, values.len()],
            data: OutputData::Float(values),
        }
    }

    fn label(v: i64) -> BackendOutput {
        BackendOutput {
            shape: vec![1],
            data: OutputData::Int(vec![v]),
        }
    }

    fn spec() -> InputSpec {
        InputSpec::new("float_input", 384)
    }

    #[test]
    fn test_valid_graph() {
        let v = GraphValidator::new(Canned::new(vec![probs(vec![0.2, 0.8]), label(1)]))
            .with_seed(Some(1));
        let r = v.validate(Path::new("g.onnx"), &spec(), 2).unwrap();
        assert_eq!(r.input_shape, vec![1, 384]);
        assert_eq!(r.output_shape, vec![1, 2]);
        assert_eq!(r.predicted_class_index, 1);
    }

    #[test]
    fn test_wrong_class_count() {
        let v = GraphValidator::new(Canned::new(vec![probs(vec![0.2, 0.3, 0.5])]));
        assert!(matches!(
            v.validate(Path::new("g.onnx"), &spec(), 2),
            Err(ValidationError::OutputShape { .. })
        ));
    }

    #[test]
    fn test_label_disagreement() {
        let v = GraphValidator::new(Canned::new(vec![probs(vec![0.9, 0.1]), label(1)]));
        assert!(matches!(
            v.validate(Path::new("g.onnx"), &spec(), 2),
            Err(ValidationError::LabelMismatch { label: 1, argmax: 0 })
        ));
    }

    #[test]
    fn test_no_outputs() {
        let v = GraphValidator::new(Canned::new(vec![]));
        assert!(matches!(
            v.validate(Path::new("g.onnx"), &spec(), 2),
            Err(ValidationError::NoOutputs)
        ));
    }

    #[test]
    fn test_integer_first_output() {
        let v = GraphValidator::new(Canned::new(vec![BackendOutput {
            shape: vec![1, 2],
            data: OutputData::Int(vec![0, 1]),
        }]));
        assert!(matches!(
            v.validate(Path::new("g.onnx"), &spec(), 2),
            Err(ValidationError::OutputType)
        ));
    }

    #[test]
    fn test_backend_failure() {
        struct Failing;
        impl ExecutionBackend for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            fn run(&self, _: &Path, _: &Tensor) -> Result<Vec<BackendOutput>, BackendError> {
                Err(BackendError::Load("truncated protobuf".into()))
            }
        }
        let err = GraphValidator::new(Box::new(Failing))
            .validate(Path::new("g.onnx"), &spec(), 2)
            .unwrap_err();
        assert!(err.to_string().contains("truncated protobuf"));
    }

    fn zero_model(rows: usize) -> LinearModel {
        let artifact = classifier_artifact::ClassifierArtifact::new("LogisticRegression")
            .with_tensor("coef", Tensor::zeros(tensor_core::Shape::matrix(rows, 384)))
            .with_tensor("intercept", Tensor::zeros(tensor_core::Shape::vector(rows)));
        LinearModel::from_artifact(&artifact, 384).unwrap()
    }

    #[test]
    fn test_parity_within_tolerance() {
        let backend = Canned::new(vec![BackendOutput {
            shape: vec![PARITY_BATCH, 2],
            data: OutputData::Float(vec![0.5; PARITY_BATCH * 2]),
        }]);
        let v = GraphValidator::new(backend);
        let deviation = v
            .check_parity(Path::new("g.onnx"), &zero_model(1), 1e-6)
            .unwrap();
        assert_eq!(deviation, 0.0);
    }

    #[test]
    fn test_parity_exceeds_tolerance() {
        let backend = Canned::new(vec![BackendOutput {
            shape: vec![PARITY_BATCH, 2],
            data: OutputData::Float(vec![0.6; PARITY_BATCH * 2]),
        }]);
        let err = GraphValidator::new(backend)
            .check_parity(Path::new("g.onnx"), &zero_model(1), 1e-3)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Parity { .. }));
    }

    #[test]
    fn test_parity_shape_mismatch() {
        let v = GraphValidator::new(Canned::new(vec![probs(vec![0.5, 0.5])]));
        assert!(matches!(
            v.check_parity(Path::new("g.onnx"), &zero_model(1), 1.0),
            Err(ValidationError::OutputShape { .. })
        ));
    }

    #[test]
    fn test_seeded_inputs_repeat() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let x = random_rows(&mut a, 2, 5);
        assert_eq!(x, random_rows(&mut b, 2, 5));
        assert!(x.as_slice().iter().all(|v| (0.0..1.0).contains(v)));
    }
}
