//! The [`SharedBuffer`] aliasing handle for live model state.
//!
//! # Ownership model
//!
//! A model owns its state through one or more `SharedBuffer`s and hands
//! clones of those handles to the adapter's variable registry. Every clone
//! aliases the same storage: a write through any handle is immediately
//! visible through all others, including the model's own.
//!
//! The handle is built on `Rc<RefCell<_>>`, so it is neither `Send` nor
//! `Sync`. Aliasing is confined to one thread by the type system; within
//! that thread, callers serialize access. Borrows returned by
//! [`read()`](SharedBuffer::read) and [`write()`](SharedBuffer::write)
//! must be dropped before the model advances, or the advance will panic
//! on the conflicting borrow.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Reference-counted, interior-mutable `f64` storage shared between a
/// model and the handles given out to drivers.
///
/// Values are stored flattened in row-major order over the owning grid's
/// shape. The length is fixed at construction.
#[derive(Clone)]
pub struct SharedBuffer {
    data: Rc<RefCell<Vec<f64>>>,
    len: usize,
}

impl SharedBuffer {
    /// Wrap `data` in a new shared buffer.
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            len: data.len(),
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// A buffer of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    /// Number of elements. Never borrows the contents.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.borrow().get(index).copied()
    }

    /// Borrow the contents for reading.
    ///
    /// # Panics
    ///
    /// Panics if a [`write()`](Self::write) borrow is outstanding.
    pub fn read(&self) -> Ref<'_, [f64]> {
        Ref::map(self.data.borrow(), |v| v.as_slice())
    }

    /// Borrow the contents for in-place mutation.
    ///
    /// # Panics
    ///
    /// Panics if any other borrow is outstanding.
    pub fn write(&self) -> RefMut<'_, [f64]> {
        RefMut::map(self.data.borrow_mut(), |v| v.as_mut_slice())
    }

    /// Borrow for reading, or `None` while a [`write()`](Self::write)
    /// borrow is outstanding.
    pub fn try_read(&self) -> Option<Ref<'_, [f64]>> {
        self.data
            .try_borrow()
            .ok()
            .map(|v| Ref::map(v, |v| v.as_slice()))
    }

    /// Borrow for writing, or `None` while any other borrow is
    /// outstanding.
    pub fn try_write(&self) -> Option<RefMut<'_, [f64]>> {
        self.data
            .try_borrow_mut()
            .ok()
            .map(|v| RefMut::map(v, |v| v.as_mut_slice()))
    }

    /// Returns `true` if `src` is exactly this buffer's contents, as handed
    /// out by a live [`read()`](Self::read) borrow.
    pub fn is_backed_by(&self, src: &[f64]) -> bool {
        match self.data.try_borrow() {
            Ok(data) => data.as_ptr() == src.as_ptr() && data.len() == src.len(),
            Err(_) => false,
        }
    }

    /// Copy the current contents into a new, independent `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.borrow().clone()
    }

    /// Overwrite the contents element-wise from `src`, in place.
    ///
    /// Existing handles keep aliasing the same storage.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != self.len()`. Callers validate lengths first.
    pub fn copy_from_slice(&self, src: &[f64]) {
        self.write().copy_from_slice(src);
    }

    /// Set every element to `value`.
    pub fn fill(&self, value: f64) {
        self.write().fill(value);
    }

    /// Returns `true` if `self` and `other` alias the same storage.
    pub fn same_storage(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Number of live handles aliasing this storage.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.data)
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.try_borrow() {
            Ok(data) => f
                .debug_struct("SharedBuffer")
                .field("len", &data.len())
                .field("handles", &Rc::strong_count(&self.data))
                .finish(),
            Err(_) => f
                .debug_struct("SharedBuffer")
                .field("borrowed", &true)
                .finish(),
        }
    }
}

impl From<Vec<f64>> for SharedBuffer {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}
