// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph construction and validation.

use crate::OpType;

/// Errors raised while validating a computation graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The graph is structurally incomplete (no nodes, inputs or outputs).
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Two values, initializers or nodes share a name.
    #[error("duplicate name '{name}'")]
    DuplicateName { name: String },

    /// A node consumes a value that is not defined before it.
    #[error("node '{node}' reads undefined value '{input}'")]
    UndefinedInput { node: String, input: String },

    /// A declared graph output is produced by no node.
    #[error("graph output '{name}' is never produced")]
    UnproducedOutput { name: String },

    /// A node has the wrong number of inputs for its operator.
    #[error("node '{node}' ({op}) expects {expected} inputs, got {actual}")]
    Arity {
        node: String,
        op: OpType,
        expected: String,
        actual: usize,
    },

    /// An operator is newer than the requested format revision.
    #[error("operator {op} requires revision {since}, but revision {revision} was requested")]
    OperatorUnavailable {
        op: OpType,
        since: u32,
        revision: u32,
    },

    /// The requested revision is newer than any this crate knows about.
    #[error("unknown format revision {revision} (newest known is {newest})")]
    UnknownRevision { revision: u32, newest: u32 },
}
