// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The linear decision function extracted from a persisted classifier.
//!
//! Every supported estimator reduces to `z = x·Wᵀ + b` followed by a
//! post-processing step that turns the `rows` raw scores into `k` class
//! columns. For binary problems `rows == 1` and `k == 2`.

use crate::ConvertError;
use classifier_artifact::ClassifierArtifact;
use tensor_core::{linear, matmul, sigmoid, softmax, Shape, Tensor, TensorError};

/// Estimators whose output is a probability distribution.
const PROBABILISTIC: &[&str] = &["LogisticRegression"];

/// Estimators whose output is a raw decision score.
const DECISION_SCORE: &[&str] = &["LinearSVC", "RidgeClassifier", "SGDClassifier", "Perceptron"];

/// How raw linear scores become per-class output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcessing {
    /// One score `z`: `p = sigmoid(z)`, columns `[1 - p, p]`.
    BinaryLogistic,
    /// One score `z` of a multinomial fit: `softmax([-z, z])`.
    BinarySoftmax,
    /// `softmax(z)` across classes.
    Softmax,
    /// `sigmoid(z)` per class, normalized by the row sum.
    OneVsRest,
    /// Raw scores; a single score `z` becomes `[-z, z]`.
    DecisionScores,
}

impl PostProcessing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BinaryLogistic => "binary_logistic",
            Self::BinarySoftmax => "binary_softmax",
            Self::Softmax => "softmax",
            Self::OneVsRest => "one_vs_rest",
            Self::DecisionScores => "decision_scores",
        }
    }
}

impl std::fmt::Display for PostProcessing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coefficients, intercepts and post-processing of a linear classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    estimator: String,
    coef: Tensor,
    intercept: Tensor,
    post: PostProcessing,
}

impl LinearModel {
    /// Extracts the decision function from an artifact.
    ///
    /// # Errors
    /// - [`ConvertError::UnsupportedModelKind`] for estimators outside the
    ///   linear family or an unknown `multi_class` option.
    /// - [`ConvertError::Conversion`] for missing tensors, a coefficient
    ///   width other than `features`, mismatched intercepts, zero classes or
    ///   non-finite weights.
    pub fn from_artifact(
        artifact: &ClassifierArtifact,
        features: usize,
    ) -> Result<Self, ConvertError> {
        let kind = artifact.estimator();
        let probabilistic = PROBABILISTIC.contains(&kind);
        if !probabilistic && !DECISION_SCORE.contains(&kind) {
            return Err(ConvertError::UnsupportedModelKind {
                kind: kind.to_string(),
                detail: "only linear classifiers can be converted".into(),
            });
        }

        let coef = artifact
            .tensor("coef")
            .ok_or_else(|| ConvertError::Conversion(format!("{kind} has no 'coef' tensor")))?;
        let intercept = artifact
            .tensor("intercept")
            .ok_or_else(|| ConvertError::Conversion(format!("{kind} has no 'intercept' tensor")))?;

        let (rows, width) = coef.shape().as_matrix().ok_or_else(|| {
            ConvertError::Conversion(format!("'coef' must be rank 2, got {}", coef.shape()))
        })?;
        if rows == 0 {
            return Err(ConvertError::Conversion("'coef' has zero classes".into()));
        }
        if width != features {
            return Err(ConvertError::Conversion(format!(
                "'coef' has {width} features but the input declares {features}"
            )));
        }
        if let Some(declared) = artifact.param("n_features_in") {
            if declared.parse::<usize>().ok() != Some(width) {
                return Err(ConvertError::Conversion(format!(
                    "'n_features_in' is {declared} but 'coef' has {width} features"
                )));
            }
        }
        // A scalar intercept is broadcast the same way the estimator stores it
        // when `fit_intercept` is off.
        let intercept = match intercept.shape().dims() {
            [n] if *n == rows => intercept.clone(),
            [] | [1] if intercept.as_slice().len() == 1 => {
                Tensor::from_vec(Shape::vector(rows), vec![intercept.as_slice()[0]; rows])?
            }
            _ => {
                return Err(ConvertError::Conversion(format!(
                    "'intercept' shape {} does not match {rows} coefficient rows",
                    intercept.shape()
                )))
            }
        };
        if !coef.is_finite() || !intercept.is_finite() {
            return Err(ConvertError::Conversion(
                "weights contain NaN or infinite values".into(),
            ));
        }

        let post = if probabilistic {
            // `auto` resolves to one-vs-rest for a single decision function.
            match (artifact.param("multi_class").unwrap_or("auto"), rows) {
                ("auto" | "ovr", 1) => PostProcessing::BinaryLogistic,
                ("multinomial", 1) => PostProcessing::BinarySoftmax,
                ("auto" | "multinomial", _) => PostProcessing::Softmax,
                ("ovr", _) => PostProcessing::OneVsRest,
                (other, _) => {
                    return Err(ConvertError::UnsupportedModelKind {
                        kind: kind.to_string(),
                        detail: format!("unknown multi_class option '{other}'"),
                    })
                }
            }
        } else {
            PostProcessing::DecisionScores
        };

        tracing::debug!("extracted {kind}: {rows}x{width} coefficients, {post}");

        Ok(Self {
            estimator: kind.to_string(),
            coef: coef.clone(),
            intercept,
            post,
        })
    }

    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    /// `[rows, n_features]`.
    pub fn coef(&self) -> &Tensor {
        &self.coef
    }

    /// `[rows]`.
    pub fn intercept(&self) -> &Tensor {
        &self.intercept
    }

    pub fn post_processing(&self) -> PostProcessing {
        self.post
    }

    /// Number of decision functions (`1` for binary problems).
    pub fn rows(&self) -> usize {
        self.coef.shape().dims()[0]
    }

    pub fn n_features(&self) -> usize {
        self.coef.shape().dims()[1]
    }

    /// Number of output columns.
    pub fn n_classes(&self) -> usize {
        if self.rows() == 1 {
            2
        } else {
            self.rows()
        }
    }

    /// Raw linear scores `x·Wᵀ + b`, shape `[batch, rows]`.
    pub fn decision_function(&self, input: &Tensor) -> Result<Tensor, TensorError> {
        let batch = input.shape().dim(0).unwrap_or(0);
        let mut out = Tensor::zeros(Shape::matrix(batch, self.rows()));
        linear(
            &input.view(),
            &self.coef.view(),
            &self.intercept.view(),
            &mut out,
        )?;
        Ok(out)
    }

    /// Per-class output columns, shape `[batch, n_classes]`: probabilities,
    /// or scores for decision-score estimators. Computed natively, so it is
    /// the reference the exported graph is compared against.
    pub fn predict_proba(&self, input: &Tensor) -> Result<Tensor, TensorError> {
        let z = self.decision_function(input)?;
        let batch = z.shape().dim(0).unwrap_or(0);

        match self.post {
            PostProcessing::BinaryLogistic => {
                let mut p = Tensor::zeros(z.shape().clone());
                sigmoid(&z.view(), &mut p)?;
                let data = p.as_slice().iter().flat_map(|&p| [1.0 - p, p]).collect();
                Tensor::from_vec(Shape::matrix(batch, 2), data)
            }
            PostProcessing::BinarySoftmax => {
                let widened = Tensor::from_vec(Shape::matrix(batch, 2), widen(&z))?;
                let mut p = Tensor::zeros(widened.shape().clone());
                softmax(&widened.view(), &mut p)?;
                Ok(p)
            }
            PostProcessing::Softmax => {
                let mut p = Tensor::zeros(z.shape().clone());
                softmax(&z.view(), &mut p)?;
                Ok(p)
            }
            PostProcessing::OneVsRest => {
                let k = self.rows();
                let mut p = Tensor::zeros(z.shape().clone());
                sigmoid(&z.view(), &mut p)?;
                // Row sums as `p · 1`, the same product the graph computes.
                let ones = Tensor::from_vec(Shape::matrix(k, 1), vec![1.0; k])?;
                let mut sums = Tensor::zeros(Shape::matrix(batch, 1));
                matmul(&p.view(), &ones.view(), &mut sums)?;
                for (row, sum) in p.as_mut_slice().chunks_exact_mut(k).zip(sums.as_slice()) {
                    row.iter_mut().for_each(|v| *v /= sum);
                }
                Ok(p)
            }
            PostProcessing::DecisionScores if self.rows() == 1 => {
                Tensor::from_vec(Shape::matrix(batch, 2), widen(&z))
            }
            PostProcessing::DecisionScores => Ok(z),
        }
    }

    /// Predicted class index for each row.
    pub fn predict(&self, input: &Tensor) -> Result<Vec<usize>, TensorError> {
        self.predict_proba(input)?.argmax_rows()
    }
}

/// `[N, 1]` scores `z` as rows `[-z, z]`.
fn widen(z: &Tensor) -> Vec<f32> {
    z.as_slice().iter().flat_map(|&z| [-z, z]).collect()
}
