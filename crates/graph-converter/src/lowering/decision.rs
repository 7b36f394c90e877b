// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Decision-score estimators (`LinearSVC`, `RidgeClassifier`, ...).
//!
//! Multi-class scores are already `[N, k]` and pass straight through. A
//! binary model has one score `z` and is widened to `[-z, z]` so the
//! positive class sits at column 1.

use super::{Lowering, SCORES};
use crate::{ConvertError, LinearModel};
use graph_ir::{AttrValue, ComputationGraph, NodeDef, OpType};

#[derive(Debug, Clone, Default)]
pub struct DecisionScores;

impl Lowering for DecisionScores {
    fn name(&self) -> &'static str {
        "decision_scores"
    }

    fn scores_name(&self, model: &LinearModel) -> &'static str {
        if model.rows() == 1 {
            super::RAW_SCORES
        } else {
            SCORES
        }
    }

    fn lower(
        &self,
        model: &LinearModel,
        graph: &mut ComputationGraph,
        scores: &str,
    ) -> Result<String, ConvertError> {
        if model.rows() > 1 {
            return Ok(scores.to_string());
        }
        graph.add_node(
            NodeDef::new("negate", OpType::Neg)
                .input(scores)
                .output("negative_scores"),
        );
        graph.add_node(
            NodeDef::new("concat", OpType::Concat)
                .input("negative_scores")
                .input(scores)
                .output(SCORES)
                .attr("axis", AttrValue::Int(1)),
        );
        Ok(SCORES.to_string())
    }
}
