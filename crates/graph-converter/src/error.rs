// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph conversion.

/// Errors that can occur while converting a classifier into a graph.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The estimator family, one of its options, or the requested format
    /// revision cannot express this model.
    #[error("unsupported model kind '{kind}': {detail}")]
    UnsupportedModelKind { kind: String, detail: String },

    /// The model is of a supported kind but its parameters are inconsistent.
    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl From<tensor_core::TensorError> for ConvertError {
    fn from(e: tensor_core::TensorError) -> Self {
        Self::Conversion(e.to_string())
    }
}
