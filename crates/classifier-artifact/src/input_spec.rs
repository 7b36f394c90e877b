// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Typed input tensor declaration derived from a descriptor.

use crate::{ArtifactError, ModelDescriptor};
use std::fmt;

/// Name of the single input tensor every exported graph declares.
pub const INPUT_TENSOR_NAME: &str = "float_input";

/// The converted graph's input: `float_input: f32[N, embedding_dim]`, where
/// `N` is a dynamic batch dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSpec {
    name: String,
    features: usize,
}

impl InputSpec {
    /// Builds the spec from a descriptor's `embedding_dim`.
    ///
    /// # Errors
    /// [`ArtifactError::InvalidDescriptor`] if `embedding_dim` is absent,
    /// zero or negative.
    pub fn from_descriptor(descriptor: &ModelDescriptor) -> Result<Self, ArtifactError> {
        match descriptor.embedding_dim {
            None => Err(ArtifactError::InvalidDescriptor(
                "'embedding_dim' is missing".into(),
            )),
            Some(d) if d <= 0 => Err(ArtifactError::InvalidDescriptor(format!(
                "'embedding_dim' must be positive, got {d}"
            ))),
            Some(d) => {
                let features = usize::try_from(d).map_err(|_| {
                    ArtifactError::InvalidDescriptor(format!("'embedding_dim' {d} is too large"))
                })?;
                Ok(Self::new(INPUT_TENSOR_NAME, features))
            }
        }
    }

    /// Creates a spec with an explicit tensor name.
    pub fn new(name: impl Into<String>, features: usize) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }

    /// Input tensor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature width (the trailing dimension).
    pub fn features(&self) -> usize {
        self.features
    }

    /// Declared shape; `None` is the dynamic batch dimension.
    pub fn shape(&self) -> Vec<Option<usize>> {
        vec![None, Some(self.features)]
    }
}

impl fmt::Display for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: f32[N, {}]", self.name, self.features)
    }
}
