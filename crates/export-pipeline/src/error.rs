// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The pipeline's error taxonomy.
//!
//! Component crates report their own errors; each maps onto exactly one
//! variant here. Every variant is fatal to the run.

use crate::{MissingCapability, ValidationError};
use classifier_artifact::ArtifactError;
use graph_converter::ConvertError;
use std::path::PathBuf;

/// Errors that end an export run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A runtime capability the pipeline needs was not built in.
    #[error("required capabilities unavailable: {}", list_missing(.0))]
    CapabilityUnavailable(Vec<MissingCapability>),

    /// An input file does not exist or cannot be read.
    #[error("missing artifact '{}': {detail}", .path.display())]
    MissingArtifact { path: PathBuf, detail: String },

    /// An input file exists but cannot be deserialized.
    #[error("corrupt artifact '{}': {detail}", .path.display())]
    CorruptArtifact { path: PathBuf, detail: String },

    /// The descriptor lacks a usable `embedding_dim`.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// The estimator cannot be expressed as a graph at the requested revision.
    #[error("unsupported model kind '{kind}': {detail}")]
    UnsupportedModelKind { kind: String, detail: String },

    /// The estimator is supported but its parameters are inconsistent.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// The exported graph failed to load, run or meet its contract.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A file could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is unreadable or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

fn list_missing(missing: &[MissingCapability]) -> String {
    missing
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PipelineError {
    /// Remediation advice, if there is any.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::CapabilityUnavailable(missing) => Some(
                missing
                    .iter()
                    .map(|m| format!("{}: {}", m.name, m.hint))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Self::UnsupportedModelKind { .. } | Self::Conversion(_) | Self::Validation(_) => Some(
                "export the raw parameters instead with `export-onnx params` \
                 and evaluate the linear model in the consumer"
                    .into(),
            ),
            Self::MissingArtifact { .. } => {
                Some("train and save the classifier before exporting".into())
            }
            _ => None,
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::MissingArtifact { path, detail } => {
                Self::MissingArtifact { path, detail }
            }
            ArtifactError::CorruptArtifact { path, detail } => {
                Self::CorruptArtifact { path, detail }
            }
            ArtifactError::InvalidDescriptor(detail) => Self::InvalidDescriptor(detail),
            ArtifactError::WriteFailed { path, source } => Self::Persistence { path, source },
        }
    }
}

impl From<ConvertError> for PipelineError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::UnsupportedModelKind { kind, detail } => {
                Self::UnsupportedModelKind { kind, detail }
            }
            ConvertError::Conversion(detail) => Self::Conversion(detail),
        }
    }
}
