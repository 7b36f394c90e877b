// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Multinomial logistic regression: softmax over the class axis.
//!
//! A binary multinomial fit stores one decision function `z`; its two
//! columns are `softmax([-z, z])`, which is not the same as `sigmoid(z)`.

use super::{Lowering, PROBABILITIES};
use crate::{ConvertError, LinearModel};
use graph_ir::{AttrValue, ComputationGraph, NodeDef, OpType};

#[derive(Debug, Clone, Default)]
pub struct Multinomial;

impl Lowering for Multinomial {
    fn name(&self) -> &'static str {
        "multinomial"
    }

    fn lower(
        &self,
        _model: &LinearModel,
        graph: &mut ComputationGraph,
        scores: &str,
    ) -> Result<String, ConvertError> {
        // axis=1 on a rank-2 tensor means the same thing before and after
        // the Softmax-13 semantics change.
        graph.add_node(
            NodeDef::new("softmax", OpType::Softmax)
                .input(scores)
                .output(PROBABILITIES)
                .attr("axis", AttrValue::Int(1)),
        );
        Ok(PROBABILITIES.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BinaryMultinomial;

impl Lowering for BinaryMultinomial {
    fn name(&self) -> &'static str {
        "binary_multinomial"
    }

    fn lower(
        &self,
        model: &LinearModel,
        graph: &mut ComputationGraph,
        scores: &str,
    ) -> Result<String, ConvertError> {
        graph.add_node(
            NodeDef::new("negate", OpType::Neg)
                .input(scores)
                .output("negative_scores"),
        );
        graph.add_node(
            NodeDef::new("concat", OpType::Concat)
                .input("negative_scores")
                .input(scores)
                .output("paired_scores")
                .attr("axis", AttrValue::Int(1)),
        );
        Multinomial.lower(model, graph, "paired_scores")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{lowered, ops};
    use graph_ir::{AttrValue, OpType};

    #[test]
    fn test_lowering() {
        let (g, out) = lowered("LogisticRegression", "multinomial", 3, 4);
        assert_eq!(out, "probabilities");
        assert_eq!(ops(&g), vec![OpType::Gemm, OpType::Softmax]);
        assert_eq!(g.nodes[1].attributes.get("axis"), Some(&AttrValue::Int(1)));
    }

    #[test]
    fn test_binary_pairs_scores_before_softmax() {
        let (g, out) = lowered("LogisticRegression", "multinomial", 1, 4);
        assert_eq!(out, "probabilities");
        assert_eq!(
            ops(&g),
            vec![OpType::Gemm, OpType::Neg, OpType::Concat, OpType::Softmax]
        );
        assert_eq!(g.nodes[3].inputs, vec!["paired_scores"]);
    }
}
