// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor arithmetic operations.
//!
//! Each operation writes into a caller-allocated output tensor whose shape
//! is checked up front, so kernels never allocate.

mod linear_op;
mod matmul_op;
mod sigmoid_op;
mod softmax_op;

pub use linear_op::linear;
pub use matmul_op::matmul;
pub use sigmoid_op::sigmoid;
pub use softmax_op::softmax;
