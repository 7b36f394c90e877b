// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Computation graph: declared inputs, constant initializers, an ordered
//! node list and declared outputs.
//!
//! # Type-State Pattern
//!
//! ```text
//! ComputationGraph<Built>      nodes appended, nothing checked.
//!       │  .validate(revision)
//!       ▼
//! ComputationGraph<Validated>  topologically ordered, names unique,
//!                              every operator available at `revision`.
//! ```
//!
//! Only a validated graph can be encoded, so the encoder never sees a graph
//! that reads undefined values or uses an operator its revision lacks.

use crate::onnx::{self, ir_version_for, NEWEST_REVISION};
use crate::{AttrValue, Dim, GraphError, Initializer, NodeDef, ValueInfo};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph under construction.
#[derive(Debug, Clone)]
pub struct Built;

/// Marker: graph checked against a format revision.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Built {}
impl GraphState for Validated {}

// ── ComputationGraph ───────────────────────────────────────────────

/// A dataflow graph in single-assignment form.
#[derive(Debug, Clone)]
pub struct ComputationGraph<S: GraphState = Built> {
    /// Graph name.
    pub name: String,
    /// Producer recorded in the encoded model.
    pub producer: (String, String),
    /// Free-form model metadata, encoded in key order.
    pub metadata: BTreeMap<String, String>,
    pub inputs: Vec<ValueInfo>,
    pub initializers: Vec<Initializer>,
    pub nodes: Vec<NodeDef>,
    pub outputs: Vec<ValueInfo>,
    revision: u32,
    _state: std::marker::PhantomData<S>,
}

// ── Built state ────────────────────────────────────────────────────

impl ComputationGraph<Built> {
    /// Creates an empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            producer: (
                env!("CARGO_PKG_NAME").to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            ),
            metadata: BTreeMap::new(),
            inputs: Vec::new(),
            initializers: Vec::new(),
            nodes: Vec::new(),
            outputs: Vec::new(),
            revision: 0,
            _state: std::marker::PhantomData,
        }
    }

    pub fn with_producer(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.producer = (name.into(), version.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn add_input(&mut self, value: ValueInfo) {
        self.inputs.push(value);
    }

    pub fn add_initializer(&mut self, init: Initializer) {
        self.initializers.push(init);
    }

    pub fn add_node(&mut self, node: NodeDef) {
        self.nodes.push(node);
    }

    pub fn add_output(&mut self, value: ValueInfo) {
        self.outputs.push(value);
    }

    /// Checks the graph and pins it to a format revision.
    ///
    /// # Checks
    /// - `revision` is not newer than [`NEWEST_REVISION`].
    /// - At least one input, node and output.
    /// - Input, initializer and node-output names are unique, as are node names.
    /// - Nodes are topologically ordered: every node input is defined earlier.
    /// - Each node's input count fits its operator.
    /// - Each operator is available at `revision`.
    /// - Every declared output is produced.
    pub fn validate(self, revision: u32) -> Result<ComputationGraph<Validated>, GraphError> {
        if revision > NEWEST_REVISION {
            return Err(GraphError::UnknownRevision {
                revision,
                newest: NEWEST_REVISION,
            });
        }
        if self.inputs.is_empty() || self.nodes.is_empty() || self.outputs.is_empty() {
            return Err(GraphError::InvalidGraph(format!(
                "graph '{}' needs at least one input, node and output",
                self.name
            )));
        }

        let mut defined: HashSet<&str> = HashSet::new();
        for value in &self.inputs {
            insert_unique(&mut defined, &value.name)?;
        }
        for init in &self.initializers {
            insert_unique(&mut defined, &init.name)?;
        }

        let mut node_names: HashSet<&str> = HashSet::new();
        for node in &self.nodes {
            insert_unique(&mut node_names, &node.name)?;

            let arity = node.op.input_arity();
            if !arity.contains(&node.inputs.len()) {
                let expected = if arity.start() == arity.end() {
                    arity.start().to_string()
                } else if *arity.end() == usize::MAX {
                    format!("at least {}", arity.start())
                } else {
                    format!("{} to {}", arity.start(), arity.end())
                };
                return Err(GraphError::Arity {
                    node: node.name.clone(),
                    op: node.op,
                    expected,
                    actual: node.inputs.len(),
                });
            }

            let since = node.op.since_version();
            if revision < since {
                return Err(GraphError::OperatorUnavailable {
                    op: node.op,
                    since,
                    revision,
                });
            }

            for input in &node.inputs {
                if !defined.contains(input.as_str()) {
                    return Err(GraphError::UndefinedInput {
                        node: node.name.clone(),
                        input: input.clone(),
                    });
                }
            }
            for output in &node.outputs {
                insert_unique(&mut defined, output)?;
            }
        }

        for output in &self.outputs {
            if !defined.contains(output.name.as_str()) {
                return Err(GraphError::UnproducedOutput {
                    name: output.name.clone(),
                });
            }
        }

        tracing::debug!(
            "graph '{}' valid at revision {revision}: {} nodes, {} initializers",
            self.name,
            self.nodes.len(),
            self.initializers.len(),
        );

        Ok(ComputationGraph {
            name: self.name,
            producer: self.producer,
            metadata: self.metadata,
            inputs: self.inputs,
            initializers: self.initializers,
            nodes: self.nodes,
            outputs: self.outputs,
            revision,
            _state: std::marker::PhantomData,
        })
    }
}

fn insert_unique<'a>(set: &mut HashSet<&'a str>, name: &'a str) -> Result<(), GraphError> {
    if set.insert(name) {
        Ok(())
    } else {
        Err(GraphError::DuplicateName {
            name: name.to_string(),
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl ComputationGraph<Validated> {
    /// Format revision the graph was validated against.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// IR version written into the model header.
    pub fn ir_version(&self) -> i64 {
        ir_version_for(self.revision)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of scalar parameters held in initializers.
    pub fn num_parameters(&self) -> usize {
        self.initializers
            .iter()
            .map(|i| i.tensor.shape().num_elements())
            .sum()
    }

    /// Names of the declared outputs, in order.
    pub fn output_names(&self) -> Vec<String> {
        self.outputs.iter().map(|o| o.name.clone()).collect()
    }

    /// Builds the protobuf model.
    pub fn to_onnx(&self) -> onnx::ModelProto {
        let graph = onnx::GraphProto {
            node: self.nodes.iter().map(node_proto).collect(),
            name: self.name.clone(),
            initializer: self.initializers.iter().map(tensor_proto).collect(),
            doc_string: String::new(),
            input: self.inputs.iter().map(value_info_proto).collect(),
            output: self.outputs.iter().map(value_info_proto).collect(),
            value_info: Vec::new(),
        };

        onnx::ModelProto {
            ir_version: self.ir_version(),
            opset_import: vec![onnx::OperatorSetIdProto {
                domain: String::new(),
                version: i64::from(self.revision),
            }],
            producer_name: self.producer.0.clone(),
            producer_version: self.producer.1.clone(),
            domain: String::new(),
            model_version: 0,
            doc_string: String::new(),
            graph: Some(graph),
            metadata_props: self
                .metadata
                .iter()
                .map(|(k, v)| onnx::StringStringEntryProto {
                    key: k.clone(),
                    value: v.clone(),
                })
                .collect(),
        }
    }

    /// Encodes the graph as ONNX protobuf bytes.
    pub fn encode(&self) -> Vec<u8> {
        prost::Message::encode_to_vec(&self.to_onnx())
    }

    /// Returns a one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "Graph '{}': {} nodes, {} parameters, revision {} (IR v{})",
            self.name,
            self.num_nodes(),
            self.num_parameters(),
            self.revision,
            self.ir_version(),
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: GraphState> fmt::Display for ComputationGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ComputationGraph '{}' ({} nodes):", self.name, self.nodes.len())?;
        for input in &self.inputs {
            writeln!(f, "  in   {input}")?;
        }
        for init in &self.initializers {
            writeln!(f, "  init {}{}", init.name, init.tensor.shape())?;
        }
        for node in &self.nodes {
            writeln!(f, "  node {}", node.summary())?;
        }
        for output in &self.outputs {
            writeln!(f, "  out  {output}")?;
        }
        Ok(())
    }
}

// ── Protobuf lowering ──────────────────────────────────────────────

fn node_proto(node: &NodeDef) -> onnx::NodeProto {
    onnx::NodeProto {
        input: node.inputs.clone(),
        output: node.outputs.clone(),
        name: node.name.clone(),
        op_type: node.op.as_str().to_string(),
        attribute: node
            .attributes
            .iter()
            .map(|(name, value)| attribute_proto(name, value))
            .collect(),
        doc_string: String::new(),
        domain: String::new(),
    }
}

fn attribute_proto(name: &str, value: &AttrValue) -> onnx::AttributeProto {
    use onnx::attribute_type as ty;

    let mut attr = onnx::AttributeProto {
        name: name.to_string(),
        ..Default::default()
    };
    match value {
        AttrValue::Int(v) => {
            attr.i = *v;
            attr.r#type = ty::INT;
        }
    }
    attr
}

fn tensor_proto(init: &Initializer) -> onnx::TensorProto {
    onnx::TensorProto {
        dims: init
            .tensor
            .shape()
            .dims()
            .iter()
            .map(|&d| d as i64)
            .collect(),
        data_type: crate::ElemType::Float.onnx_code(),
        float_data: init.tensor.as_slice().to_vec(),
        int64_data: Vec::new(),
        name: init.name.clone(),
        raw_data: Vec::new(),
    }
}

fn value_info_proto(value: &ValueInfo) -> onnx::ValueInfoProto {
    use onnx::tensor_shape_proto::{dimension, Dimension};

    let dim = value
        .dims
        .iter()
        .map(|d| Dimension {
            value: Some(match d {
                Dim::Fixed(n) => dimension::Value::DimValue(*n as i64),
                Dim::Dynamic(name) => dimension::Value::DimParam(name.clone()),
            }),
            denotation: String::new(),
        })
        .collect();

    onnx::ValueInfoProto {
        name: value.name.clone(),
        r#type: Some(onnx::TypeProto {
            value: Some(onnx::type_proto::Value::TensorType(onnx::type_proto::Tensor {
                elem_type: value.elem_type.onnx_code(),
                shape: Some(onnx::TensorShapeProto { dim }),
            })),
        }),
        doc_string: String::new(),
    }
}
