// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node definitions for the computation graph.
//!
//! A [`NodeDef`] names an operator, the values it reads and writes, and its
//! attributes. Values are referenced by name only; tensors live in the
//! graph's initializer list.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Operators the converter emits. Every one is in the default ONNX domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpType {
    /// General matrix multiply, `alpha·A·op(B) + beta·C`.
    Gemm,
    /// Plain matrix product.
    MatMul,
    /// Logistic function, element-wise.
    Sigmoid,
    /// Normalized exponential along an axis.
    Softmax,
    /// Broadcast subtraction.
    Sub,
    /// Broadcast division.
    Div,
    /// Element-wise negation.
    Neg,
    /// Join along an axis.
    Concat,
    /// Index of the maximum along an axis.
    ArgMax,
}

impl OpType {
    /// The ONNX `op_type` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemm => "Gemm",
            Self::MatMul => "MatMul",
            Self::Sigmoid => "Sigmoid",
            Self::Softmax => "Softmax",
            Self::Sub => "Sub",
            Self::Div => "Div",
            Self::Neg => "Neg",
            Self::Concat => "Concat",
            Self::ArgMax => "ArgMax",
        }
    }

    /// First opset revision with the semantics the converter relies on.
    ///
    /// `Gemm`, `Sub` and `Div` need multidirectional bias broadcasting (7);
    /// `Sigmoid` and `Neg` dropped the legacy `consumed_inputs` attribute in 6;
    /// `Concat` made `axis` mandatory in 4.
    pub fn since_version(&self) -> u32 {
        match self {
            Self::Gemm | Self::Sub | Self::Div => 7,
            Self::Sigmoid | Self::Neg => 6,
            Self::Concat => 4,
            Self::MatMul | Self::Softmax | Self::ArgMax => 1,
        }
    }

    /// Accepted number of inputs.
    pub fn input_arity(&self) -> RangeInclusive<usize> {
        match self {
            Self::Gemm => 2..=3,
            Self::MatMul | Self::Sub | Self::Div => 2..=2,
            Self::Sigmoid | Self::Softmax | Self::Neg | Self::ArgMax => 1..=1,
            Self::Concat => 1..=usize::MAX,
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
        }
    }
}

/// One operator application in the graph.
///
/// Attributes are kept in a `BTreeMap` so they encode in name order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDef {
    /// Unique node name.
    pub name: String,
    /// Operator.
    pub op: OpType,
    /// Names of consumed values, in operator argument order.
    pub inputs: Vec<String>,
    /// Names of produced values.
    pub outputs: Vec<String>,
    /// Operator attributes.
    pub attributes: BTreeMap<String, AttrValue>,
}

impl NodeDef {
    /// Starts a node with no inputs, outputs or attributes.
    pub fn new(name: impl Into<String>, op: OpType) -> Self {
        Self {
            name: name.into(),
            op,
            inputs: Vec::new(),
            outputs: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Appends an input.
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    /// Appends an output.
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Sets an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// One-line description, e.g. `gemm: Gemm(float_input, coef, intercept) -> logits`.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "{}: {}({}) -> {}",
            self.name,
            self.op,
            self.inputs.join(", "),
            self.outputs.join(", "),
        );
        if !self.attributes.is_empty() {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            s.push_str(&format!(" [{}]", attrs.join(", ")));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_strings() {
        assert_eq!(OpType::Gemm.as_str(), "Gemm");
        assert_eq!(OpType::ArgMax.to_string(), "ArgMax");
    }

    #[test]
    fn test_since_versions_fit_default_revision() {
        let all = [
            OpType::Gemm,
            OpType::MatMul,
            OpType::Sigmoid,
            OpType::Softmax,
            OpType::Sub,
            OpType::Div,
            OpType::Neg,
            OpType::Concat,
            OpType::ArgMax,
        ];
        assert!(all.iter().all(|op| op.since_version() <= 13));
        assert_eq!(all.iter().map(|op| op.since_version()).max(), Some(7));
    }

    #[test]
    fn test_arity() {
        assert!(OpType::Gemm.input_arity().contains(&3));
        assert!(!OpType::Sigmoid.input_arity().contains(&2));
        assert!(OpType::Concat.input_arity().contains(&5));
    }

    #[test]
    fn test_builder_and_summary() {
        let node = NodeDef::new("gemm", OpType::Gemm)
            .input("float_input")
            .input("coef")
            .input("intercept")
            .output("logits")
            .attr("transB", AttrValue::Int(1))
            .attr("beta", AttrValue::Int(1));

        assert_eq!(node.inputs.len(), 3);
        // Attributes are listed in name order regardless of insertion order.
        assert_eq!(
            node.summary(),
            "gemm: Gemm(float_input, coef, intercept) -> logits [beta=1, transB=1]"
        );
    }
}
