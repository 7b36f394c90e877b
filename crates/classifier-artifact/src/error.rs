// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for artifact and descriptor handling.

use std::path::PathBuf;

/// Errors that can occur while reading or writing classifier artifacts and
/// descriptors.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The path does not resolve to a readable file.
    #[error("missing artifact '{}': {detail}", .path.display())]
    MissingArtifact { path: PathBuf, detail: String },

    /// The file exists but its contents could not be deserialized.
    #[error("corrupt artifact '{}': {detail}", .path.display())]
    CorruptArtifact { path: PathBuf, detail: String },

    /// The descriptor parsed, but a field has an unusable value.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Serializing or writing a file failed.
    #[error("failed to write '{}': {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
