// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `export-onnx inspect`: describe the classifier and decode an exported
//! graph, if one exists.

use super::{banner, truncate};
use anyhow::Context;
use classifier_artifact::{ArtifactLoader, InputSpec};
use export_pipeline::{PipelineConfig, PipelineError};
use graph_converter::LinearModel;
use graph_ir::onnx::{ModelProto, ValueInfoProto};
use prost::Message;
use std::path::{Path, PathBuf};

pub fn execute(config: PipelineConfig, graph: Option<PathBuf>) -> anyhow::Result<()> {
    banner("inspect");

    let (artifact, descriptor) =
        ArtifactLoader::load(&config.artifact_path, &config.descriptor_path)
            .map_err(PipelineError::from)?;
    let spec = InputSpec::from_descriptor(&descriptor).map_err(PipelineError::from)?;

    println!("  Model:       {}", descriptor.model_name);
    println!("  Artifact:    {}", artifact.summary());
    println!("  Input:       {spec}");
    println!(
        "  Classes:     {}",
        truncate(&descriptor.classes.join(", "), 60)
    );
    match LinearModel::from_artifact(&artifact, spec.features()) {
        Ok(model) => println!(
            "  Lowering:    {} ({} rows, {} classes)",
            model.post_processing().as_str(),
            model.rows(),
            model.n_classes()
        ),
        Err(e) => println!("  Lowering:    not convertible: {e}"),
    }
    match &descriptor.onnx_model_path {
        Some(location) => println!("  Published:   {location}"),
        None => println!("  Published:   no"),
    }
    println!();

    let path = graph.unwrap_or(config.output_path);
    if !path.is_file() {
        println!("  No graph at '{}' yet; run `export-onnx` first.", path.display());
        return Ok(());
    }
    describe_graph(&path)
}

fn describe_graph(path: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading graph '{}'", path.display()))?;
    let model = ModelProto::decode(bytes.as_slice())
        .with_context(|| format!("'{}' is not an ONNX model", path.display()))?;
    let graph = model
        .graph
        .with_context(|| format!("'{}' has no graph", path.display()))?;

    let opset = model
        .opset_import
        .iter()
        .find(|o| o.domain.is_empty())
        .map(|o| o.version)
        .unwrap_or_default();
    println!("  Graph:       {} ({:.1} KB)", path.display(), bytes.len() as f64 / 1024.0);
    println!(
        "  Producer:    {} {} · IR v{} · opset {}",
        model.producer_name, model.producer_version, model.ir_version, opset
    );
    for entry in &model.metadata_props {
        println!("  {:<12} {}", format!("{}:", entry.key), entry.value);
    }
    println!();

    println!("  Inputs:");
    for input in &graph.input {
        println!("    {}", value_line(input));
    }
    println!("  Initializers:");
    for init in &graph.initializer {
        println!("    {}: {:?}", init.name, init.dims);
    }
    println!("  Nodes:");
    for (i, node) in graph.node.iter().enumerate() {
        println!(
            "    {:>2}. {:<8} ({}) → {}",
            i + 1,
            node.op_type,
            node.input.join(", "),
            node.output.join(", ")
        );
    }
    println!("  Outputs:");
    for output in &graph.output {
        println!("    {}", value_line(output));
    }
    Ok(())
}

fn value_line(value: &ValueInfoProto) -> String {
    match value.r#type.as_ref().and_then(|t| t.tensor_parts()) {
        Some((elem, dims)) => {
            let elem = match elem {
                1 => "f32".to_string(),
                7 => "i64".to_string(),
                other => format!("type{other}"),
            };
            format!("{}: {}[{}]", value.name, elem, dims.join(", "))
        }
        None => value.name.clone(),
    }
}
