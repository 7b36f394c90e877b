// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::{DType, Shape, TensorError};

/// An owned, n-dimensional `f32` tensor stored in row-major order.
///
/// `Tensor` carries classifier weights out of the artifact loader and
/// activations through the native decision function. Immutable views are
/// handed to kernels via [`TensorView`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::zeros(Shape::matrix(2, 3));
    /// assert_eq!(t.size_bytes(), 24);
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            data: vec![0.0; n],
        }
    }

    /// Creates a tensor by copying a slice of `f32` values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_vec(shape, values.to_vec())
    }

    /// Creates a tensor taking ownership of `values`.
    pub fn from_vec(shape: Shape, values: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if values.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            shape,
            data: values,
        })
    }

    /// Decodes little-endian bytes of the given dtype into an `f32` tensor.
    ///
    /// `F64` values are narrowed to `f32`. Integer dtypes are rejected.
    pub fn from_le_bytes(shape: Shape, dtype: DType, bytes: &[u8]) -> Result<Self, TensorError> {
        let expected_bytes = shape.size_bytes(dtype);
        if bytes.len() != expected_bytes {
            return Err(TensorError::BufferSizeMismatch {
                expected: shape.num_elements(),
                actual: bytes.len() / dtype.size_bytes(),
            });
        }

        let data = match dtype {
            DType::F32 => bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            DType::F64 => bytes
                .chunks_exact(8)
                .map(|c| {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32
                })
                .collect(),
            DType::I64 => {
                return Err(TensorError::UnsupportedDType {
                    op: "from_le_bytes",
                    dtype,
                })
            }
        };

        Ok(Self { shape, data })
    }

    /// Encodes the tensor as little-endian `f32` bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns an immutable view over this tensor's data.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            shape: &self.shape,
            data: &self.data,
        }
    }

    /// Returns the memory footprint of this tensor in bytes.
    pub fn size_bytes(&self) -> usize {
        self.shape.size_bytes(DType::F32)
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the elements mutably in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns `true` if every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Returns the index of the largest element of each row of a rank-2
    /// tensor. Ties resolve to the first maximum.
    pub fn argmax_rows(&self) -> Result<Vec<usize>, TensorError> {
        let (rows, cols) = self.shape.as_matrix().ok_or_else(|| TensorError::ShapeMismatch {
            op: "argmax_rows",
            lhs: self.shape.clone(),
            rhs: Shape::matrix(0, 0),
        })?;
        if cols == 0 {
            return Err(TensorError::Numeric {
                op: "argmax_rows",
                detail: "rows have no columns".into(),
            });
        }

        Ok((0..rows)
            .map(|r| {
                let row = &self.data[r * cols..(r + 1) * cols];
                let mut best = 0;
                for (j, &v) in row.iter().enumerate().skip(1) {
                    if v > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect())
    }

    /// Largest absolute element-wise difference from `other`.
    ///
    /// Returns `None` if the shapes differ.
    pub fn max_abs_diff(&self, other: &Tensor) -> Option<f32> {
        if self.shape != other.shape {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f32::max),
        )
    }
}

/// A borrowed, read-only view over a [`Tensor`]'s data.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    shape: &'a Shape,
    data: &'a [f32],
}

impl<'a> TensorView<'a> {
    /// Returns the shape of the viewed tensor.
    pub fn shape(&self) -> &Shape {
        self.shape
    }

    /// Returns the viewed elements.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(Shape::matrix(2, 3));
        assert_eq!(t.size_bytes(), 24);
        assert!(t.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_f32_size_mismatch() {
        let result = Tensor::from_f32(Shape::matrix(2, 3), &[1.0; 5]);
        assert!(matches!(
            result,
            Err(TensorError::BufferSizeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_from_le_bytes_f32() {
        let bytes: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let t = Tensor::from_le_bytes(Shape::vector(2), DType::F32, &bytes).unwrap();
        assert_eq!(t.as_slice(), &[1.5, -2.0]);
    }

    #[test]
    fn test_from_le_bytes_f64_narrows() {
        let bytes: Vec<u8> = [0.25f64, 3.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let t = Tensor::from_le_bytes(Shape::vector(2), DType::F64, &bytes).unwrap();
        assert_eq!(t.as_slice(), &[0.25, 3.0]);
    }

    #[test]
    fn test_from_le_bytes_rejects_integers() {
        let bytes = vec![0u8; 16];
        let result = Tensor::from_le_bytes(Shape::vector(2), DType::I64, &bytes);
        assert!(matches!(result, Err(TensorError::UnsupportedDType { .. })));
    }

    #[test]
    fn test_from_le_bytes_truncated() {
        let result = Tensor::from_le_bytes(Shape::vector(2), DType::F32, &[0u8; 7]);
        assert!(result.is_err());
    }

    #[test]
    fn test_le_bytes_preserve_values() {
        let t = Tensor::from_f32(Shape::matrix(1, 3), &[0.1, 0.2, 0.3]).unwrap();
        let back = Tensor::from_le_bytes(Shape::matrix(1, 3), DType::F32, &t.to_le_bytes()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_argmax_rows_first_max_wins() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[0.2, 0.5, 0.5, 0.9, 0.05, 0.05]).unwrap();
        assert_eq!(t.argmax_rows().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_argmax_rows_requires_matrix() {
        let t = Tensor::zeros(Shape::vector(3));
        assert!(t.argmax_rows().is_err());
    }

    #[test]
    fn test_max_abs_diff() {
        let a = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(3), &[1.0, 2.5, 2.0]).unwrap();
        assert_eq!(a.max_abs_diff(&b), Some(1.0));
        assert_eq!(a.max_abs_diff(&Tensor::zeros(Shape::vector(2))), None);
    }

    #[test]
    fn test_is_finite() {
        let mut t = Tensor::zeros(Shape::vector(4));
        assert!(t.is_finite());
        t.as_mut_slice()[0] = f32::NAN;
        assert!(!t.is_finite());
    }
}
