// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-converter
//!
//! Lowers a persisted linear classifier into an ONNX inference graph.
//!
//! Conversion is two steps: [`LinearModel::from_artifact`] reduces the
//! estimator to `x·Wᵀ + b` plus a [`PostProcessing`] kind, and a
//! [`Lowering`] emits the nodes for that kind.
//!
//! | Estimator | Classes | Lowering | First output |
//! |---|---|---|---|
//! | `LogisticRegression` (`auto`, `ovr`) | 2 | [`BinaryLogistic`] | `probabilities` |
//! | `LogisticRegression` (`multinomial`) | 2 | [`BinaryMultinomial`] | `probabilities` |
//! | `LogisticRegression` (`auto`, `multinomial`) | k | [`Multinomial`] | `probabilities` |
//! | `LogisticRegression` (`ovr`) | k | [`OneVsRest`] | `probabilities` |
//! | `LinearSVC`, `RidgeClassifier`, `SGDClassifier`, `Perceptron` | any | [`DecisionScores`] | `scores` |
//!
//! Every graph ends with `label = ArgMax(axis=1)`.
//!
//! # Example
//! ```no_run
//! use classifier_artifact::{ArtifactLoader, InputSpec};
//! use graph_converter::GraphConverter;
//! use std::path::Path;
//!
//! let (artifact, descriptor) = ArtifactLoader::load(
//!     Path::new("models/classifier_model.safetensors"),
//!     Path::new("models/model_metadata.json"),
//! ).unwrap();
//! let spec = InputSpec::from_descriptor(&descriptor).unwrap();
//! let graph = GraphConverter::default().convert(&artifact, &spec).unwrap();
//! println!("{}", graph.summary());
//! ```

mod converter;
mod error;
pub mod lowering;
mod model;

pub use converter::{convert, ConvertedGraph, GraphConverter, BATCH_DIM, DEFAULT_REVISION, LABEL};
pub use error::ConvertError;
pub use lowering::binary_logistic::BinaryLogistic;
pub use lowering::decision::DecisionScores;
pub use lowering::multinomial::{BinaryMultinomial, Multinomial};
pub use lowering::one_vs_rest::OneVsRest;
pub use lowering::Lowering;
pub use model::{LinearModel, PostProcessing};
