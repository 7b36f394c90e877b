// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`GraphConverter`]: classifier artifact in, encoded graph out.

use crate::lowering::{self, Lowering};
use crate::{ConvertError, LinearModel, PostProcessing};
use classifier_artifact::{ClassifierArtifact, InputSpec};
use graph_ir::{
    AttrValue, ComputationGraph, Dim, ElemType, GraphError, Initializer, NodeDef, OpType,
    Validated, ValueInfo, NEWEST_REVISION,
};

/// Opset revision used when none is requested.
pub const DEFAULT_REVISION: u32 = 13;

/// Name of the predicted-label output.
pub const LABEL: &str = "label";

/// Symbolic name of the batch dimension.
pub const BATCH_DIM: &str = "N";

/// Converts linear classifiers into ONNX graphs at a fixed opset revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConverter {
    revision: u32,
}

impl Default for GraphConverter {
    fn default() -> Self {
        Self::new(DEFAULT_REVISION)
    }
}

impl GraphConverter {
    pub fn new(revision: u32) -> Self {
        Self { revision }
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Builds, validates and encodes the graph for `artifact`.
    ///
    /// The graph declares `spec` as its only input, then emits
    /// `Gemm(transB=1)` over the `coef`/`intercept` initializers, the
    /// estimator's post-processing, and an `ArgMax` label. Outputs are the
    /// per-class columns `f32[N, k]` followed by `label: i64[N]`.
    ///
    /// Nothing is written to disk. Identical inputs produce identical bytes.
    ///
    /// # Errors
    /// - [`ConvertError::UnsupportedModelKind`] for estimators outside the
    ///   linear family, or a revision older than an emitted operator.
    /// - [`ConvertError::Conversion`] for inconsistent weights or a revision
    ///   newer than [`NEWEST_REVISION`].
    pub fn convert(
        &self,
        artifact: &ClassifierArtifact,
        spec: &InputSpec,
    ) -> Result<ConvertedGraph, ConvertError> {
        if self.revision > NEWEST_REVISION {
            return Err(ConvertError::Conversion(format!(
                "revision {} is newer than the newest known revision {NEWEST_REVISION}",
                self.revision
            )));
        }

        let model = LinearModel::from_artifact(artifact, spec.features())?;
        let lowering = lowering::select(model.post_processing());
        tracing::info!(
            "converting {} ({} classes) with {} lowering at revision {}",
            model.estimator(),
            model.n_classes(),
            lowering.name(),
            self.revision,
        );

        let graph = build_graph(&model, lowering.as_ref(), spec)?;
        let graph = graph.validate(self.revision).map_err(|e| match &e {
            GraphError::OperatorUnavailable { .. } => ConvertError::UnsupportedModelKind {
                kind: model.estimator().to_string(),
                detail: e.to_string(),
            },
            _ => ConvertError::Conversion(e.to_string()),
        })?;

        let bytes = graph.encode();
        tracing::debug!("{} ({} bytes encoded)", graph.summary(), bytes.len());

        Ok(ConvertedGraph {
            input_name: spec.name().to_string(),
            output_names: graph.output_names(),
            estimator: model.estimator().to_string(),
            post_processing: model.post_processing(),
            n_classes: model.n_classes(),
            graph,
            bytes,
        })
    }
}

/// Converts with an explicit revision.
pub fn convert(
    artifact: &ClassifierArtifact,
    spec: &InputSpec,
    target_revision: u32,
) -> Result<ConvertedGraph, ConvertError> {
    GraphConverter::new(target_revision).convert(artifact, spec)
}

fn build_graph(
    model: &LinearModel,
    lowering: &dyn Lowering,
    spec: &InputSpec,
) -> Result<ComputationGraph, ConvertError> {
    let batch = || Dim::Dynamic(BATCH_DIM.to_string());
    let scores = lowering.scores_name(model);

    let mut graph = ComputationGraph::new(format!("{}_graph", model.estimator()))
        .with_producer(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .with_metadata("estimator", model.estimator())
        .with_metadata("post_processing", model.post_processing().as_str());

    graph.add_input(ValueInfo::new(
        spec.name(),
        ElemType::Float,
        vec![batch(), Dim::Fixed(spec.features())],
    ));
    graph.add_initializer(Initializer::new("coef", model.coef().clone()));
    graph.add_initializer(Initializer::new("intercept", model.intercept().clone()));
    graph.add_node(
        NodeDef::new("gemm", OpType::Gemm)
            .input(spec.name())
            .input("coef")
            .input("intercept")
            .output(scores)
            .attr("transB", AttrValue::Int(1)),
    );

    let columns = lowering.lower(model, &mut graph, scores)?;

    graph.add_node(
        NodeDef::new("argmax", OpType::ArgMax)
            .input(columns.as_str())
            .output(LABEL)
            .attr("axis", AttrValue::Int(1))
            .attr("keepdims", AttrValue::Int(0)),
    );
    graph.add_output(ValueInfo::new(
        columns,
        ElemType::Float,
        vec![batch(), Dim::Fixed(model.n_classes())],
    ));
    graph.add_output(ValueInfo::new(LABEL, ElemType::Int64, vec![batch()]));

    Ok(graph)
}

/// An encoded graph and the contract it declares.
#[derive(Debug, Clone)]
pub struct ConvertedGraph {
    graph: ComputationGraph<Validated>,
    bytes: Vec<u8>,
    input_name: String,
    output_names: Vec<String>,
    estimator: String,
    post_processing: PostProcessing,
    n_classes: usize,
}

impl ConvertedGraph {
    /// Encoded ONNX protobuf.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn graph(&self) -> &ComputationGraph<Validated> {
        &self.graph
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Per-class columns first, then the label.
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    pub fn post_processing(&self) -> PostProcessing {
        self.post_processing
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn revision(&self) -> u32 {
        self.graph.revision()
    }

    pub fn node_count(&self) -> usize {
        self.graph.num_nodes()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} -> {} nodes, outputs [{}], revision {}, {:.1} KB",
            self.estimator,
            self.node_count(),
            self.output_names.join(", "),
            self.revision(),
            self.bytes.len() as f64 / 1024.0,
        )
    }
}
