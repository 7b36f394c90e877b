// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Lowering`] trait and its implementations.
//!
//! A lowering appends the nodes that turn the `Gemm` scores `[N, rows]` into
//! the first graph output `[N, k]`. The converter owns everything before
//! (input, weights, `Gemm`) and after (`ArgMax` label).

pub mod binary_logistic;
pub mod decision;
pub mod multinomial;
pub mod one_vs_rest;

use crate::{ConvertError, LinearModel, PostProcessing};
use graph_ir::ComputationGraph;

/// Name of the first output for probabilistic estimators.
pub const PROBABILITIES: &str = "probabilities";
/// Name of the first output for decision-score estimators.
pub const SCORES: &str = "scores";
/// Default name of the `Gemm` output.
pub const RAW_SCORES: &str = "raw_scores";

/// Emits post-processing nodes for one [`PostProcessing`] kind.
///
/// Lowerings only add nodes and constants; they perform no I/O, so each
/// can be tested by validating the graph it produces.
pub trait Lowering: Send + Sync {
    /// Human-readable name of this lowering.
    fn name(&self) -> &'static str;

    /// Name the converter gives the `Gemm` output.
    fn scores_name(&self, _model: &LinearModel) -> &'static str {
        RAW_SCORES
    }

    /// Appends nodes reading `scores` and returns the name of the value
    /// that becomes the first graph output.
    fn lower(
        &self,
        model: &LinearModel,
        graph: &mut ComputationGraph,
        scores: &str,
    ) -> Result<String, ConvertError>;
}

/// Returns the lowering for a post-processing kind.
pub fn select(post: PostProcessing) -> Box<dyn Lowering> {
    match post {
        PostProcessing::BinaryLogistic => Box::new(binary_logistic::BinaryLogistic),
        PostProcessing::BinarySoftmax => Box::new(multinomial::BinaryMultinomial),
        PostProcessing::Softmax => Box::new(multinomial::Multinomial),
        PostProcessing::OneVsRest => Box::new(one_vs_rest::OneVsRest),
        PostProcessing::DecisionScores => Box::new(decision::DecisionScores),
    }
}
