// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Typed graph values: declared inputs/outputs and constant initializers.

use std::fmt;
use tensor_core::Tensor;

/// Element type of a graph value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemType {
    Float,
    Int64,
}

impl ElemType {
    /// `TensorProto.DataType` code.
    pub fn onnx_code(self) -> i32 {
        match self {
            Self::Float => 1,
            Self::Int64 => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float => "f32",
            Self::Int64 => "i64",
        }
    }
}

/// One dimension of a declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Known at conversion time.
    Fixed(usize),
    /// Symbolic, bound when the graph is run (e.g. the batch size `N`).
    Dynamic(String),
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Dynamic(name) => f.write_str(name),
        }
    }
}

/// A declared graph input or output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueInfo {
    pub name: String,
    pub elem_type: ElemType,
    pub dims: Vec<Dim>,
}

impl ValueInfo {
    pub fn new(name: impl Into<String>, elem_type: ElemType, dims: Vec<Dim>) -> Self {
        Self {
            name: name.into(),
            elem_type,
            dims,
        }
    }
}

impl fmt::Display for ValueInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.dims.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}[{}]", self.name, self.elem_type.as_str(), dims.join(", "))
    }
}

/// A named constant tensor baked into the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub name: String,
    pub tensor: Tensor,
}

impl Initializer {
    pub fn new(name: impl Into<String>, tensor: Tensor) -> Self {
        Self {
            name: name.into(),
            tensor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_info_display() {
        let v = ValueInfo::new(
            "float_input",
            ElemType::Float,
            vec![Dim::Dynamic("N".into()), Dim::Fixed(384)],
        );
        assert_eq!(v.to_string(), "float_input: f32[N, 384]");
    }

    #[test]
    fn test_onnx_codes() {
        assert_eq!(ElemType::Float.onnx_code(), 1);
        assert_eq!(ElemType::Int64.onnx_code(), 7);
    }
}
