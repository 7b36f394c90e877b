// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution backends: engines that load a persisted graph and run it.
//!
//! The backend is deliberately a different code path from the converter.
//! It only ever sees the bytes on disk.

use std::path::Path;
use tensor_core::Tensor;

/// Element data of one graph output.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputData {
    Float(Vec<f32>),
    Int(Vec<i64>),
}

/// One graph output as returned by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutput {
    pub shape: Vec<usize>,
    pub data: OutputData,
}

impl BackendOutput {
    /// The output as an `f32` tensor, if it holds floats.
    pub fn to_tensor(&self) -> Option<Tensor> {
        match &self.data {
            OutputData::Float(values) => {
                Tensor::from_f32(tensor_core::Shape::new(self.shape.clone()), values).ok()
            }
            OutputData::Int(_) => None,
        }
    }
}

/// Failure inside a backend, before any contract check.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("cannot load graph: {0}")]
    Load(String),
    #[error("inference failed: {0}")]
    Run(String),
}

/// An engine able to run a persisted ONNX graph.
pub trait ExecutionBackend: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Loads the graph at `graph_path` with its first input fixed to
    /// `input`'s shape, runs it once and returns every output in
    /// declaration order.
    fn run(&self, graph_path: &Path, input: &Tensor) -> Result<Vec<BackendOutput>, BackendError>;
}

#[cfg(feature = "tract")]
pub use self::tract::TractBackend;

#[cfg(feature = "tract")]
mod tract {
    use super::{BackendError, BackendOutput, ExecutionBackend, OutputData};
    use std::path::Path;
    use tract_onnx::prelude::*;

    /// Pure-Rust ONNX engine.
    #[derive(Debug, Clone, Default)]
    pub struct TractBackend;

    impl TractBackend {
        pub fn new() -> Self {
            Self
        }
    }

    impl ExecutionBackend for TractBackend {
        fn name(&self) -> &str {
            "tract-onnx"
        }

        fn run(
            &self,
            graph_path: &Path,
            input: &tensor_core::Tensor,
        ) -> Result<Vec<BackendOutput>, BackendError> {
            let dims = input.shape().dims().to_vec();
            let load = |e: TractError| BackendError::Load(format!("{e:#}"));

            let model = tract_onnx::onnx()
                .model_for_path(graph_path)
                .map_err(load)?
                .with_input_fact(0, f32::fact(dims.clone()).into())
                .map_err(load)?
                .into_optimized()
                .map_err(load)?
                .into_runnable()
                .map_err(load)?;

            let run = |e: TractError| BackendError::Run(format!("{e:#}"));
            let tensor = Tensor::from_shape(&dims, input.as_slice()).map_err(run)?;
            let outputs = model.run(tvec!(tensor.into())).map_err(run)?;

            outputs
                .iter()
                .map(|value| -> Result<BackendOutput, BackendError> {
                    let shape = value.shape().to_vec();
                    let data = if value.datum_type() == i64::datum_type() {
                        OutputData::Int(value.as_slice::<i64>().map_err(run)?.to_vec())
                    } else {
                        let cast = value.cast_to::<f32>().map_err(run)?;
                        OutputData::Float(cast.as_slice::<f32>().map_err(run)?.to_vec())
                    };
                    Ok(BackendOutput { shape, data })
                })
                .collect()
        }
    }
}
