// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Small dense tensor types and the kernels needed to evaluate a linear
//! classifier natively, outside of any graph runtime.
//!
//! This crate provides:
//! - [`Tensor`]: an owned, row-major `f32` tensor.
//! - [`Shape`]: runtime shape descriptors.
//! - [`DType`]: element types found in persisted weights (`f32`, `f64`, `i64`).
//! - Kernels: matrix multiplication, the affine `linear` map (`x·Wᵀ + b`),
//!   logistic sigmoid and softmax.
//!
//! Stored weights may be `f64`; they are narrowed to `f32` on decode so every
//! kernel works on a single element type, the same one the exported graph
//! declares for its input.

mod dtype;
mod error;
mod ops;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::TensorError;
pub use ops::{linear, matmul, sigmoid, softmax};
pub use shape::Shape;
pub use tensor::{Tensor, TensorView};
