//! Reading and writing registered variables by name.
//!
//! [`ValueExchange`] is a borrowed view over a [`VariableRegistry`]. Reads
//! either hand out a handle aliasing the model's own buffer
//! ([`value_ref`](ValueExchange::value_ref)) or an independent snapshot
//! ([`value_copy`](ValueExchange::value_copy)). Writes go into the model's
//! storage in place, so every outstanding handle sees them.
//!
//! Every write validates its whole input before touching the buffer: a
//! failed write leaves the variable exactly as it was. A buffer a driver
//! still has borrowed through a handle is reported as
//! [`AdapterError::BufferBorrowed`] rather than panicking.

use std::cell::{Ref, RefMut};

use tether_core::SharedBuffer;

use crate::error::AdapterError;
use crate::registry::{VariableDescriptor, VariableRegistry};

/// Name-keyed access to live variable buffers.
#[derive(Clone, Copy, Debug)]
pub struct ValueExchange<'r> {
    variables: &'r VariableRegistry,
}

impl<'r> ValueExchange<'r> {
    /// Wrap a registry.
    pub fn new(variables: &'r VariableRegistry) -> Self {
        Self { variables }
    }

    /// Handle aliasing the live buffer of `name`.
    ///
    /// Later model updates and `set_value` calls are visible through the
    /// returned handle.
    pub fn value_ref(&self, name: &str) -> Result<SharedBuffer, AdapterError> {
        Ok(self.variables.get(name)?.buffer().clone())
    }

    /// Snapshot of the current values of `name`, in flat row-major order.
    pub fn value_copy(&self, name: &str) -> Result<Vec<f64>, AdapterError> {
        let var = self.variables.get(name)?;
        let data = read(var)?;
        Ok(data.to_vec())
    }

    /// Overwrite every value of `name` in place.
    ///
    /// `src` may be a [`read()`](SharedBuffer::read) borrow of the variable
    /// itself, in which case the write is a no-op.
    pub fn set_value(&self, name: &str, src: &[f64]) -> Result<(), AdapterError> {
        let var = self.variables.get(name)?;
        check_len(var, src.len())?;
        if var.buffer().is_backed_by(src) {
            return Ok(());
        }
        write(var)?.copy_from_slice(src);
        Ok(())
    }

    /// Values of `name` at the given flat indices, in the order given.
    pub fn value_at_indices(
        &self,
        name: &str,
        indices: &[usize],
    ) -> Result<Vec<f64>, AdapterError> {
        let var = self.variables.get(name)?;
        check_indices(var, indices)?;
        let data = read(var)?;
        Ok(indices.iter().map(|&i| data[i]).collect())
    }

    /// Write `src[k]` to flat index `indices[k]` of `name`.
    ///
    /// With repeated indices the last write wins.
    pub fn set_value_at_indices(
        &self,
        name: &str,
        indices: &[usize],
        src: &[f64],
    ) -> Result<(), AdapterError> {
        let var = self.variables.get(name)?;
        if indices.len() != src.len() {
            return Err(AdapterError::ShapeMismatch {
                name: name.to_string(),
                expected: indices.len(),
                actual: src.len(),
            });
        }
        check_indices(var, indices)?;
        let mut data = write(var)?;
        for (&i, &v) in indices.iter().zip(src) {
            data[i] = v;
        }
        Ok(())
    }
}

fn read(var: &VariableDescriptor) -> Result<Ref<'_, [f64]>, AdapterError> {
    var.buffer()
        .try_read()
        .ok_or_else(|| AdapterError::BufferBorrowed {
            name: var.name().to_string(),
        })
}

fn write(var: &VariableDescriptor) -> Result<RefMut<'_, [f64]>, AdapterError> {
    var.buffer()
        .try_write()
        .ok_or_else(|| AdapterError::BufferBorrowed {
            name: var.name().to_string(),
        })
}

fn check_len(var: &VariableDescriptor, actual: usize) -> Result<(), AdapterError> {
    let expected = var.element_count();
    if actual != expected {
        return Err(AdapterError::ShapeMismatch {
            name: var.name().to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_indices(var: &VariableDescriptor, indices: &[usize]) -> Result<(), AdapterError> {
    let len = var.element_count();
    match indices.iter().find(|&&i| i >= len) {
        Some(&index) => Err(AdapterError::IndexOutOfBounds {
            name: var.name().to_string(),
            index,
            len,
        }),
        None => Ok(()),
    }
}
