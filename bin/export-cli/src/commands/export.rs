// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `export-onnx [export]`: the full convert, validate and publish run.

use super::{banner, truncate};
use export_pipeline::{CapabilityReport, ExportPipeline, PipelineConfig};

/// Runs the export. `config` is only read once `capabilities` has been
/// found complete.
pub fn execute(
    capabilities: CapabilityReport,
    config: impl FnOnce() -> anyhow::Result<PipelineConfig>,
) -> anyhow::Result<()> {
    banner("export");

    println!("[1/5] Probing capabilities...");
    let backend = capabilities.into_backend()?;
    println!("  validation backend: {}", backend.name());

    let config = config()?;
    println!("  Artifact:    {}", config.artifact_path.display());
    println!("  Descriptor:  {}", config.descriptor_path.display());
    println!("  Output:      {}", config.output_path.display());
    println!("  Opset:       {}", config.target_revision);
    if let Some(tolerance) = config.parity_tolerance {
        println!("  Parity:      ±{tolerance:e}");
    }

    println!("[2/5] Loading classifier...");
    let pipeline = ExportPipeline::new(config, backend).load()?;
    println!(
        "  {} · {} classes · input {}",
        pipeline.artifact().estimator(),
        pipeline.descriptor().num_classes(),
        pipeline.spec()
    );

    println!("[3/5] Converting to ONNX...");
    let pipeline = pipeline.convert()?;
    println!("  {}", pipeline.graph().summary());

    println!("[4/5] Validating in an independent engine...");
    let pipeline = pipeline.validate()?;
    let validation = pipeline.validation();
    println!(
        "  input {:?} → output {:?}, first row predicts class {}",
        validation.input_shape, validation.output_shape, validation.predicted_class_index
    );
    if let Some(deviation) = validation.parity_deviation {
        println!("  max deviation from native model: {deviation:e}");
    }

    println!("[5/5] Publishing descriptor...");
    let report = pipeline.publish()?;

    println!();
    println!("  ┌─────────────────────────┬──────────────────────────────┐");
    println!("  │ Field                   │ Value                        │");
    println!("  ├─────────────────────────┼──────────────────────────────┤");
    let rows = [
        ("graph", report.graph_path.display().to_string()),
        ("size", format!("{:.1} KB", report.graph_bytes as f64 / 1024.0)),
        ("sha256", report.sha256.clone()),
        ("estimator", report.estimator.clone()),
        ("outputs", report.output_names.join(", ")),
        ("opset", report.revision.to_string()),
        (
            "input",
            format!(
                "{} {:?}",
                report.descriptor.input_name.as_deref().unwrap_or("-"),
                report.descriptor.input_shape.as_deref().unwrap_or_default()
            ),
        ),
    ];
    for (field, value) in rows {
        println!("  │ {:<23} │ {:<28} │", field, truncate(&value, 28));
    }
    println!("  └─────────────────────────┴──────────────────────────────┘");
    println!();
    println!("  {}", report.metrics.summary());
    println!("  ✓ Export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use export_pipeline::{MissingCapability, PipelineError};

    #[test]
    fn test_missing_capability_stops_before_config() {
        let report = CapabilityReport::Missing(vec![MissingCapability {
            name: "tract-onnx (ONNX execution engine)".into(),
            hint: "rebuild with `cargo build --features tract`".into(),
        }]);

        let err = execute(report, || panic!("configuration read before the capability check"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::CapabilityUnavailable(_))
        ));
    }
}
