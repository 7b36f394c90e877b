// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Startup probe for optional capabilities.
//!
//! The ONNX encoder is always compiled in. The execution engine used for
//! validation sits behind the `tract` feature, so a build without it can
//! still report precisely what is missing instead of failing mid-run.

use crate::{ExecutionBackend, PipelineError};

/// A capability the pipeline needs but this build lacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapability {
    pub name: String,
    /// How to obtain it.
    pub hint: String,
}

/// Outcome of [`Capabilities::probe`].
pub enum CapabilityReport {
    Available(Box<dyn ExecutionBackend>),
    Missing(Vec<MissingCapability>),
}

impl CapabilityReport {
    /// The backend, or [`PipelineError::CapabilityUnavailable`].
    pub fn into_backend(self) -> Result<Box<dyn ExecutionBackend>, PipelineError> {
        match self {
            Self::Available(backend) => Ok(backend),
            Self::Missing(missing) => Err(PipelineError::CapabilityUnavailable(missing)),
        }
    }
}

impl std::fmt::Debug for CapabilityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(backend) => f.debug_tuple("Available").field(&backend.name()).finish(),
            Self::Missing(missing) => f.debug_tuple("Missing").field(missing).finish(),
        }
    }
}

pub struct Capabilities;

impl Capabilities {
    /// Checks which capabilities this build carries.
    #[cfg(feature = "tract")]
    pub fn probe() -> CapabilityReport {
        let backend = crate::TractBackend::new();
        tracing::debug!("execution backend available: {}", backend.name());
        CapabilityReport::Available(Box::new(backend))
    }

    /// Checks which capabilities this build carries.
    #[cfg(not(feature = "tract"))]
    pub fn probe() -> CapabilityReport {
        tracing::warn!("built without an ONNX execution backend");
        CapabilityReport::Missing(vec![MissingCapability {
            name: "tract-onnx (ONNX execution engine)".into(),
            hint: "rebuild with `cargo build --features tract`".into(),
        }])
    }

    /// Names of the capabilities compiled in, for diagnostics.
    pub fn compiled() -> Vec<&'static str> {
        let mut names = vec!["onnx-encoder (prost)"];
        if cfg!(feature = "tract") {
            names.push("onnx-execution (tract-onnx)");
        }
        names
    }
}
