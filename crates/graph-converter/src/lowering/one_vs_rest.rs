// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One-vs-rest logistic regression: per-class sigmoid, normalized by the
//! row sum.
//!
//! The row sum is a `MatMul` against a `[k, 1]` column of ones, which keeps
//! the lowering free of reduce operators whose signature changed between
//! revisions.

use super::{Lowering, PROBABILITIES};
use crate::{ConvertError, LinearModel};
use graph_ir::{ComputationGraph, Initializer, NodeDef, OpType};
use tensor_core::{Shape, Tensor};

#[derive(Debug, Clone, Default)]
pub struct OneVsRest;

impl Lowering for OneVsRest {
    fn name(&self) -> &'static str {
        "one_vs_rest"
    }

    fn lower(
        &self,
        model: &LinearModel,
        graph: &mut ComputationGraph,
        scores: &str,
    ) -> Result<String, ConvertError> {
        let k = model.n_classes();
        graph.add_initializer(Initializer::new(
            "ones_column",
            Tensor::from_vec(Shape::matrix(k, 1), vec![1.0; k])?,
        ));
        graph.add_node(
            NodeDef::new("sigmoid", OpType::Sigmoid)
                .input(scores)
                .output("class_proba"),
        );
        graph.add_node(
            NodeDef::new("row_sum", OpType::MatMul)
                .input("class_proba")
                .input("ones_column")
                .output("proba_sum"),
        );
        graph.add_node(
            NodeDef::new("normalize", OpType::Div)
                .input("class_proba")
                .input("proba_sum")
                .output(PROBABILITIES),
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
        let (g, out) = lowered("LogisticRegression", "ovr", 4, 3);
        assert_eq!(out, "probabilities");
        assert_eq!(
            ops(&g),
            vec![OpType::Gemm, OpType::Sigmoid, OpType::MatMul, OpType::Div]
        );
        let ones = g.initializers.iter().find(|i| i.name == "ones_column").unwrap();
        assert_eq!(ones.tensor.shape().dims(), &[4, 1]);
    }
}
