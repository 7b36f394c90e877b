// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # export-pipeline
//!
//! Orchestrates the export of a trained linear classifier:
//!
//! 1. probe capabilities ([`Capabilities`]),
//! 2. load the classifier and its descriptor,
//! 3. convert it into an ONNX graph and write it,
//! 4. reload the graph in an independent engine and smoke-test it
//!    ([`GraphValidator`]),
//! 5. publish the calling convention into the descriptor
//!    ([`DescriptorUpdater`]).
//!
//! # Type-State Pipeline
//! ```text
//! ExportPipeline<Idle> → <Loaded> → <Converted> → <Validated> → ExportReport
//! ```
//! Transitions are compile-time checked.
//!
//! # Features
//! - `tract` (default): validate with the pure-Rust `tract-onnx` engine.
//!   Without it, [`Capabilities::probe`] reports the engine as missing and
//!   the pipeline refuses to start.

mod backend;
mod capabilities;
mod config;
mod error;
mod metrics;
mod params;
mod pipeline;
mod publish;
mod validator;

#[cfg(feature = "tract")]
pub use backend::TractBackend;
pub use backend::{BackendError, BackendOutput, ExecutionBackend, OutputData};
pub use capabilities::{Capabilities, CapabilityReport, MissingCapability};
pub use config::{install_root, PipelineConfig, CONFIG_FILE_NAME};
pub use error::PipelineError;
pub use metrics::{ExportMetrics, StageMetrics};
pub use params::export_params;
pub use pipeline::{
    Converted, ExportPipeline, ExportReport, Idle, Loaded, PipelineState, Validated,
};
pub use publish::{DescriptorUpdater, Publication};
pub use validator::{GraphValidator, ValidationError, ValidationResult, PARITY_BATCH};
