//! Variable declarations made by a model.

use crate::buffer::SharedBuffer;
use crate::element::ElementType;
use crate::id::GridId;

/// What a model reports about one of its exchangeable variables.
///
/// The adapter turns each spec into a registry descriptor at
/// initialization. `buffer` must alias the model's live storage, not a
/// copy: drivers that hold it observe every subsequent advance.
#[derive(Clone, Debug)]
pub struct VariableSpec {
    /// Unit annotation (e.g. `"C"`, `"m s-1"`, `"-"`).
    pub unit: String,
    /// Grid the variable is defined on.
    pub grid: GridId,
    /// Element type of the stored values.
    pub element_type: ElementType,
    /// Live, row-major flattened view of the variable's values.
    pub buffer: SharedBuffer,
}

impl VariableSpec {
    /// A `float64` variable on `grid` backed by `buffer`.
    pub fn float64(unit: impl Into<String>, grid: GridId, buffer: SharedBuffer) -> Self {
        Self {
            unit: unit.into(),
            grid,
            element_type: ElementType::Float64,
            buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float64_spec_aliases_buffer() {
        let state = SharedBuffer::zeros(4);
        let spec = VariableSpec::float64("K", GridId(0), state.clone());
        assert_eq!(spec.element_type, ElementType::Float64);
        assert!(spec.buffer.same_storage(&state));
        assert_eq!(spec.unit, "K");
    }
}
