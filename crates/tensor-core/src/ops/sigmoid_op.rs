// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Logistic sigmoid activation.

use crate::{Tensor, TensorError, TensorView};

/// Computes `output[i] = 1 / (1 + exp(-x[i]))` element-wise.
///
/// Negative inputs go through `exp(x) / (1 + exp(x))` so large magnitudes
/// never overflow.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if input and output shapes differ.
pub fn sigmoid(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    if input.shape() != output.shape() {
        return Err(TensorError::ShapeMismatch {
            op: "sigmoid",
            lhs: input.shape().clone(),
            rhs: output.shape().clone(),
        });
    }

    for (d, &x) in output.as_mut_slice().iter_mut().zip(input.as_slice()) {
        *d = if x >= 0.0 {
            1.0 / (1.0 + (-x).exp())
        } else {
            let e = x.exp();
            e / (1.0 + e)
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[test]
    fn test_sigmoid_midpoint() {
        let input = Tensor::from_f32(Shape::vector(1), &[0.0]).unwrap();
        let mut output = Tensor::zeros(Shape::vector(1));
        sigmoid(&input.view(), &mut output).unwrap();
        assert!((output.as_slice()[0] - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        let input = Tensor::from_f32(Shape::vector(2), &[2.0, -2.0]).unwrap();
        let mut output = Tensor::zeros(Shape::vector(2));
        sigmoid(&input.view(), &mut output).unwrap();
        let r = output.as_slice();
        assert!((r[0] + r[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sigmoid_extremes_are_finite() {
        let input = Tensor::from_f32(Shape::vector(2), &[1000.0, -1000.0]).unwrap();
        let mut output = Tensor::zeros(Shape::vector(2));
        sigmoid(&input.view(), &mut output).unwrap();
        assert_eq!(output.as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn test_sigmoid_shape_mismatch() {
        let input = Tensor::zeros(Shape::vector(2));
        let mut output = Tensor::zeros(Shape::vector(3));
        assert!(sigmoid(&input.view(), &mut output).is_err());
    }
}
