// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-ir
//!
//! A small dataflow IR for inference graphs and its ONNX encoding.
//!
//! - [`OpType`], [`NodeDef`], [`AttrValue`]: operators and their application.
//! - [`ValueInfo`], [`Dim`], [`ElemType`], [`Initializer`]: typed values.
//! - [`ComputationGraph`]: the graph, with a **type-state pattern**
//!   (`Built` → `Validated`). Validation pins the graph to an opset revision
//!   and rejects operators that revision does not have.
//! - [`onnx`]: the protobuf messages the validated graph encodes into.
//!
//! # Example
//! ```
//! use graph_ir::{ComputationGraph, Dim, ElemType, NodeDef, OpType, ValueInfo};
//!
//! let mut g = ComputationGraph::new("neg");
//! g.add_input(ValueInfo::new("x", ElemType::Float, vec![Dim::Dynamic("N".into())]));
//! g.add_node(NodeDef::new("neg", OpType::Neg).input("x").output("y"));
//! g.add_output(ValueInfo::new("y", ElemType::Float, vec![Dim::Dynamic("N".into())]));
//!
//! let bytes = g.validate(13).unwrap().encode();
//! assert!(!bytes.is_empty());
//! ```

mod error;
pub mod graph;
mod node;
pub mod onnx;
mod value;

pub use error::GraphError;
pub use graph::{Built, ComputationGraph, Validated};
pub use node::{AttrValue, NodeDef, OpType};
pub use onnx::{ir_version_for, NEWEST_REVISION};
pub use value::{Dim, ElemType, Initializer, ValueInfo};
