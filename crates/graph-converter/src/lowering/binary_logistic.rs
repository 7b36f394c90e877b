// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Binary logistic regression: `p = sigmoid(z)`, output `[1 - p, p]`.

use super::{Lowering, PROBABILITIES};
use crate::{ConvertError, LinearModel};
use graph_ir::{AttrValue, ComputationGraph, Initializer, NodeDef, OpType};
use tensor_core::{Shape, Tensor};

#[derive(Debug, Clone, Default)]
pub struct BinaryLogistic;

impl Lowering for BinaryLogistic {
    fn name(&self) -> &'static str {
        "binary_logistic"
    }

    fn lower(
        &self,
        _model: &LinearModel,
        graph: &mut ComputationGraph,
        scores: &str,
    ) -> Result<String, ConvertError> {
        graph.add_initializer(Initializer::new(
            "one",
            Tensor::from_f32(Shape::vector(1), &[1.0])?,
        ));
        graph.add_node(
            NodeDef::new("sigmoid", OpType::Sigmoid)
                .input(scores)
                .output("positive_proba"),
        );
        graph.add_node(
            NodeDef::new("complement", OpType::Sub)
                .input("one")
                .input("positive_proba")
                .output("negative_proba"),
        );
        graph.add_node(
            NodeDef::new("concat", OpType::Concat)
                .input("negative_proba")
                .input("positive_proba")
                .output(PROBABILITIES)
                .attr("axis", AttrValue::Int(1)),
        );
        Ok(PROBABILITIES.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{lowered, ops};
    use graph_ir::OpType;

    #[test]
    fn test_lowering() {
        let (g, out) = lowered("LogisticRegression", "auto", 1, 4);
        assert_eq!(out, "probabilities");
        assert_eq!(
            ops(&g),
            vec![OpType::Gemm, OpType::Sigmoid, OpType::Sub, OpType::Concat]
        );
        // Class 0 column comes first.
        assert_eq!(g.nodes[3].inputs, vec!["negative_proba", "positive_proba"]);
    }
}
