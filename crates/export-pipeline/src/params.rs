// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Raw parameter export: the linear model as plain JSON.
//!
//! This is the degraded integration path for consumers that cannot load a
//! graph, or for models whose graph failed to convert or validate. The
//! consumer evaluates `x·Wᵀ + b` itself and applies `post_processing`.
//!
//! ```json
//! {
//!   "model_name": "demo",
//!   "estimator": "LogisticRegression",
//!   "classes": ["neg", "pos"],
//!   "n_features": 384,
//!   "post_processing": "binary_logistic",
//!   "coef": [[0.1, ...]],
//!   "intercept": [0.0]
//! }
//! ```

use crate::PipelineError;
use classifier_artifact::ModelDescriptor;
use graph_converter::{LinearModel, PostProcessing};
use std::path::Path;

#[derive(Debug, serde::Serialize)]
struct ParamsDocument<'a> {
    model_name: &'a str,
    estimator: &'a str,
    classes: &'a [String],
    n_features: usize,
    post_processing: PostProcessing,
    coef: Vec<&'a [f32]>,
    intercept: &'a [f32],
}

/// Writes the model's parameters to `path` and returns the byte count.
pub fn export_params(
    model: &LinearModel,
    descriptor: &ModelDescriptor,
    path: &Path,
) -> Result<usize, PipelineError> {
    let coef = model.coef();
    let doc = ParamsDocument {
        model_name: &descriptor.model_name,
        estimator: model.estimator(),
        classes: &descriptor.classes,
        n_features: model.n_features(),
        post_processing: model.post_processing(),
        coef: coef.as_slice().chunks(model.n_features()).collect(),
        intercept: model.intercept().as_slice(),
    };

    let mut json = serde_json::to_string_pretty(&doc).map_err(|e| {
        PipelineError::persistence(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    json.push('\n');
    std::fs::write(path, &json).map_err(|e| PipelineError::persistence(path, e))?;

    tracing::info!(
        "wrote {} parameters to '{}'",
        coef.shape().num_elements() + model.rows(),
        path.display()
    );
    Ok(json.len())
}
