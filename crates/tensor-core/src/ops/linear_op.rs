// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Affine map used by every linear classifier: `output = input · weightᵀ + bias`.

use crate::{Shape, Tensor, TensorError, TensorView};

/// Computes `output = input · weightᵀ + bias`.
///
/// Shapes follow the persisted classifier layout:
/// - `input`: `[M, K]` (one row per sample).
/// - `weight`: `[N, K]` (one row per decision function).
/// - `bias`: `[N]`.
/// - `output`: `[M, N]`.
///
/// The weight is consumed row-major without materialising its transpose;
/// each output element is a dot product of two contiguous rows.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] on any inconsistent dimension.
pub fn linear(
    input: &TensorView<'_>,
    weight: &TensorView<'_>,
    bias: &TensorView<'_>,
    output: &mut Tensor,
) -> Result<(), TensorError> {
    let mismatch = |lhs: &Shape, rhs: &Shape| TensorError::ShapeMismatch {
        op: "linear",
        lhs: lhs.clone(),
        rhs: rhs.clone(),
    };

    let (m, k) = input
        .shape()
        .as_matrix()
        .ok_or_else(|| mismatch(input.shape(), weight.shape()))?;
    let (n, k_w) = weight
        .shape()
        .as_matrix()
        .ok_or_else(|| mismatch(input.shape(), weight.shape()))?;
    if k != k_w {
        return Err(mismatch(input.shape(), weight.shape()));
    }
    if bias.shape().dims() != [n] {
        return Err(mismatch(weight.shape(), bias.shape()));
    }

    let expected = Shape::matrix(m, n);
    if output.shape() != &expected {
        return Err(TensorError::ShapeMismatch {
            op: "linear (output)",
            lhs: expected,
            rhs: output.shape().clone(),
        });
    }

    let x = input.as_slice();
    let w = weight.as_slice();
    let b = bias.as_slice();
    let out = output.as_mut_slice();

    for i in 0..m {
        let x_row = &x[i * k..(i + 1) * k];
        for j in 0..n {
            let w_row = &w[j * k..(j + 1) * k];
            let dot: f32 = x_row.iter().zip(w_row).map(|(a, c)| a * c).sum();
            out[i * n + j] = dot + b[j];
        }
    }

    Ok(())
}
