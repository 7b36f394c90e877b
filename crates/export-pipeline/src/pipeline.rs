// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The export pipeline with type-state–enforced stage ordering.
//!
//! ```text
//! ExportPipeline<Idle>
//!     │  .load()       read classifier + descriptor, derive the input spec
//!     ▼
//! ExportPipeline<Loaded>
//!     │  .convert()    build and encode the graph, then write it
//!     ▼
//! ExportPipeline<Converted>
//!     │  .validate()   reload from disk and run in the backend
//!     ▼
//! ExportPipeline<Validated>
//!     │  .publish()    merge and persist the descriptor
//!     ▼
//!   ExportReport
//! ```
//!
//! Each transition consumes the previous value, so the descriptor cannot be
//! published before the graph has validated, and a conversion failure
//! leaves no graph on disk.

use crate::publish::{DescriptorUpdater, Publication};
use crate::{
    Capabilities, ExecutionBackend, ExportMetrics, GraphValidator, PipelineConfig, PipelineError,
    ValidationResult,
};
use classifier_artifact::{ArtifactLoader, ClassifierArtifact, InputSpec, ModelDescriptor};
use graph_converter::{ConvertedGraph, GraphConverter, LinearModel};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Instant;

// ── Type-state markers ─────────────────────────────────────────

/// Nothing read yet.
#[derive(Debug)]
pub struct Idle;

/// Inputs read and checked.
#[derive(Debug)]
pub struct Loaded {
    artifact: ClassifierArtifact,
    descriptor: ModelDescriptor,
    spec: InputSpec,
}

/// Graph encoded and written.
#[derive(Debug)]
pub struct Converted {
    descriptor: ModelDescriptor,
    spec: InputSpec,
    model: LinearModel,
    graph: ConvertedGraph,
    sha256: String,
}

/// Graph accepted by the execution backend.
#[derive(Debug)]
pub struct Validated {
    descriptor: ModelDescriptor,
    spec: InputSpec,
    graph: ConvertedGraph,
    sha256: String,
    validation: ValidationResult,
}

/// Sealed trait for pipeline states.
pub trait PipelineState: std::fmt::Debug {}
impl PipelineState for Idle {}
impl PipelineState for Loaded {}
impl PipelineState for Converted {}
impl PipelineState for Validated {}

// ── Report ─────────────────────────────────────────────────────

/// Summary of a successful run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExportReport {
    pub graph_path: PathBuf,
    pub graph_bytes: usize,
    /// Hex SHA-256 of the graph file.
    pub sha256: String,
    pub estimator: String,
    pub output_names: Vec<String>,
    pub revision: u32,
    pub validation: ValidationResult,
    #[serde(skip)]
    pub descriptor: ModelDescriptor,
    pub metrics: ExportMetrics,
}

// ── Pipeline ───────────────────────────────────────────────────

/// Converts one classifier and publishes it.
///
/// # Example
/// ```no_run
/// use export_pipeline::{ExportPipeline, PipelineConfig};
///
/// # fn example() -> Result<(), export_pipeline::PipelineError> {
/// let report = ExportPipeline::probe(PipelineConfig::default())?
///     .load()?
///     .convert()?
///     .validate()?
///     .publish()?;
/// println!("{}", report.metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct ExportPipeline<S: PipelineState = Idle> {
    config: PipelineConfig,
    validator: GraphValidator,
    metrics: ExportMetrics,
    state: S,
}

impl<S: PipelineState> std::fmt::Debug for ExportPipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("config", &self.config)
            .field("backend", &self.validator.backend_name())
            .field("metrics", &self.metrics)
            .field("state", &self.state)
            .finish()
    }
}

impl<S: PipelineState> ExportPipeline<S> {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ExportMetrics {
        &self.metrics
    }

    fn advance<T: PipelineState>(
        self,
        stage: &'static str,
        started: Instant,
        state: T,
    ) -> ExportPipeline<T> {
        let mut metrics = self.metrics;
        metrics.record(stage, started.elapsed());
        ExportPipeline {
            config: self.config,
            validator: self.validator,
            metrics,
            state,
        }
    }
}

// ── Idle → Loaded ──────────────────────────────────────────────

impl ExportPipeline<Idle> {
    /// Creates a pipeline validating with `backend`.
    pub fn new(config: PipelineConfig, backend: Box<dyn ExecutionBackend>) -> Self {
        tracing::info!("export pipeline using backend '{}'", backend.name());
        let validator = GraphValidator::new(backend).with_seed(config.validation_seed);
        Self {
            config,
            validator,
            metrics: ExportMetrics::new(),
            state: Idle,
        }
    }

    /// Probes capabilities and creates a pipeline with the available backend.
    ///
    /// # Errors
    /// [`PipelineError::CapabilityUnavailable`] if no backend is built in.
    pub fn probe(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.check()?;
        let backend = Capabilities::probe().into_backend()?;
        Ok(Self::new(config, backend))
    }

    /// Reads the classifier and descriptor and derives the input spec.
    pub fn load(self) -> Result<ExportPipeline<Loaded>, PipelineError> {
        let started = Instant::now();
        let (artifact, descriptor) =
            ArtifactLoader::load(&self.config.artifact_path, &self.config.descriptor_path)?;
        let spec = InputSpec::from_descriptor(&descriptor)?;
        tracing::info!("input spec: {spec}");

        Ok(self.advance(
            "load",
            started,
            Loaded {
                artifact,
                descriptor,
                spec,
            },
        ))
    }

    /// Runs every stage.
    pub fn run(self) -> Result<ExportReport, PipelineError> {
        self.load()?.convert()?.validate()?.publish()
    }
}

// ── Loaded → Converted ─────────────────────────────────────────

impl ExportPipeline<Loaded> {
    pub fn artifact(&self) -> &ClassifierArtifact {
        &self.state.artifact
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.state.descriptor
    }

    pub fn spec(&self) -> &InputSpec {
        &self.state.spec
    }

    /// Converts the classifier and writes the graph to `output_path`.
    ///
    /// The graph is fully encoded in memory first; the file is only touched
    /// once conversion has succeeded.
    pub fn convert(self) -> Result<ExportPipeline<Converted>, PipelineError> {
        let started = Instant::now();
        let Loaded {
            artifact,
            descriptor,
            spec,
        } = &self.state;

        let model = LinearModel::from_artifact(artifact, spec.features())?;
        let graph = GraphConverter::new(self.config.target_revision).convert(artifact, spec)?;

        let path = &self.config.output_path;
        std::fs::write(path, graph.bytes()).map_err(|e| PipelineError::persistence(path, e))?;
        let sha256 = hex_digest(graph.bytes());
        tracing::info!(
            "wrote '{}' ({:.1} KB, sha256 {})",
            path.display(),
            graph.bytes().len() as f64 / 1024.0,
            &sha256[..12],
        );

        let state = Converted {
            descriptor: descriptor.clone(),
            spec: spec.clone(),
            model,
            graph,
            sha256,
        };
        let mut next = self.advance("convert", started, state);
        next.metrics.graph_bytes = next.state.graph.bytes().len();
        Ok(next)
    }
}

// ── Converted → Validated ──────────────────────────────────────

impl ExportPipeline<Converted> {
    pub fn graph(&self) -> &ConvertedGraph {
        &self.state.graph
    }

    pub fn sha256(&self) -> &str {
        &self.state.sha256
    }

    /// Reloads the written graph into the backend and checks its contract
    /// against the descriptor's class list. With `parity_tolerance` set,
    /// also compares it with the native model.
    pub fn validate(self) -> Result<ExportPipeline<Validated>, PipelineError> {
        let started = Instant::now();
        let path = &self.config.output_path;
        let Converted {
            descriptor,
            spec,
            model,
            ..
        } = &self.state;

        let mut validation = self
            .validator
            .validate(path, spec, descriptor.num_classes())?;
        if let Some(tolerance) = self.config.parity_tolerance {
            let deviation = self.validator.check_parity(path, model, tolerance)?;
            validation.parity_deviation = Some(deviation);
        }

        let ExportPipeline {
            config,
            validator,
            mut metrics,
            state,
        } = self;
        let Converted {
            descriptor,
            spec,
            graph,
            sha256,
            ..
        } = state;
        metrics.record("validate", started.elapsed());

        Ok(ExportPipeline {
            config,
            validator,
            metrics,
            state: Validated {
                descriptor,
                spec,
                graph,
                sha256,
                validation,
            },
        })
    }
}

// ── Validated → ExportReport ───────────────────────────────────

impl ExportPipeline<Validated> {
    pub fn validation(&self) -> &ValidationResult {
        &self.state.validation
    }

    /// Merges the graph's calling convention into the descriptor and writes
    /// it back.
    pub fn publish(self) -> Result<ExportReport, PipelineError> {
        let started = Instant::now();
        let Validated {
            descriptor,
            spec,
            graph,
            sha256,
            validation,
        } = self.state;

        let publication =
            Publication::new(&self.config.output_path, &self.config.descriptor_path, &spec);
        let updated = DescriptorUpdater::apply(&descriptor, &publication);
        DescriptorUpdater::persist(&updated, &self.config.descriptor_path)?;
        tracing::info!(
            "descriptor '{}' now points at '{}'",
            self.config.descriptor_path.display(),
            publication.graph_location,
        );

        let mut metrics = self.metrics;
        metrics.record("publish", started.elapsed());

        Ok(ExportReport {
            graph_path: self.config.output_path,
            graph_bytes: graph.bytes().len(),
            sha256,
            estimator: graph.estimator().to_string(),
            output_names: graph.output_names().to_vec(),
            revision: graph.revision(),
            validation,
            descriptor: updated,
            metrics,
        })
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digest() {
        assert_eq!(
            hex_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
