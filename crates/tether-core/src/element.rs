//! Element type tags for variable buffers.

use std::fmt;

/// Scalar type of the elements stored in a variable buffer.
///
/// Drivers use the tag together with [`item_size`](ElementType::item_size)
/// to size their own receive buffers. Tether buffers currently store
/// `f64`, so models report [`ElementType::Float64`]; the other tags exist
/// so a model can describe what it natively computes in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit IEEE 754 float.
    Float32,
    /// 64-bit IEEE 754 float.
    Float64,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
}

impl ElementType {
    /// Size in bytes of one element.
    pub fn item_size(self) -> usize {
        match self {
            Self::Float32 | Self::Int32 => 4,
            Self::Float64 | Self::Int64 => 8,
        }
    }

    /// Canonical lowercase name (`"float64"`, `"int32"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
