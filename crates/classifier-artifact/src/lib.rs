// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # classifier-artifact
//!
//! The input side of the export pipeline: a trained classifier persisted by
//! the training environment, plus the JSON descriptor that tells consumers
//! how to call it.
//!
//! - [`ClassifierArtifact`]: the estimator as persisted: an estimator name,
//!   string parameters, and named weight tensors, stored in SafeTensors.
//! - [`ModelDescriptor`]: the `model_metadata.json` record. Unknown keys are
//!   carried through untouched.
//! - [`ArtifactLoader`]: reads both from disk.
//! - [`InputSpec`]: the typed input tensor derived from a descriptor.
//!
//! # On-disk layout
//! ```text
//! models/
//!   classifier_model.safetensors   coef [rows, d], intercept [rows]
//!   model_metadata.json            {"model_name", "embedding_dim", "classes", ...}
//! ```
//!
//! # Example
//! ```no_run
//! use classifier_artifact::{ArtifactLoader, InputSpec};
//! use std::path::Path;
//!
//! let (artifact, descriptor) = ArtifactLoader::load(
//!     Path::new("models/classifier_model.safetensors"),
//!     Path::new("models/model_metadata.json"),
//! ).unwrap();
//! let spec = InputSpec::from_descriptor(&descriptor).unwrap();
//! println!("{} -> {spec}", artifact.summary());
//! ```

mod artifact;
mod descriptor;
mod error;
mod input_spec;
mod loader;

pub use artifact::{ClassifierArtifact, ESTIMATOR_KEY};
pub use descriptor::ModelDescriptor;
pub use error::ArtifactError;
pub use input_spec::{InputSpec, INPUT_TENSOR_NAME};
pub use loader::ArtifactLoader;
