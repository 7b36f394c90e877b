// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `export-onnx params`: dump the linear parameters as JSON.

use super::banner;
use classifier_artifact::{ArtifactLoader, InputSpec};
use export_pipeline::{export_params, PipelineConfig, PipelineError};
use graph_converter::LinearModel;
use std::path::PathBuf;

pub fn execute(config: PipelineConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    banner("params");

    let (artifact, descriptor) =
        ArtifactLoader::load(&config.artifact_path, &config.descriptor_path)
            .map_err(PipelineError::from)?;
    let spec = InputSpec::from_descriptor(&descriptor).map_err(PipelineError::from)?;
    let model =
        LinearModel::from_artifact(&artifact, spec.features()).map_err(PipelineError::from)?;

    let path = output.unwrap_or(config.params_path);
    let bytes = export_params(&model, &descriptor, &path)?;
    println!(
        "  ✓ Wrote {} ({} × {} coefficients, {} bytes)",
        path.display(),
        model.rows(),
        model.n_features(),
        bytes
    );
    Ok(())
}
