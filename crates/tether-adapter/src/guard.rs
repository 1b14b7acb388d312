//! Scoped perturbation of a model's time step.
//!
//! [`StepGuard`] scales the step on construction and puts the original
//! back when dropped. Restoration therefore happens on every exit path,
//! including `?` propagation of a model failure and unwinding.

use std::ops::{Deref, DerefMut};

use tether_model::NumericalModel;

/// Borrow of a model whose time step is temporarily scaled.
pub struct StepGuard<'m, M: NumericalModel + ?Sized> {
    model: &'m mut M,
    original: f64,
}

impl<'m, M: NumericalModel + ?Sized> StepGuard<'m, M> {
    /// Set the model's step to `factor` times its current value.
    pub fn scale(model: &'m mut M, factor: f64) -> Self {
        let original = model.time_step();
        model.set_time_step(original * factor);
        Self { model, original }
    }
}

impl<M: NumericalModel + ?Sized> Deref for StepGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: NumericalModel + ?Sized> DerefMut for StepGuard<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.model
    }
}

impl<M: NumericalModel + ?Sized> Drop for StepGuard<'_, M> {
    fn drop(&mut self) {
        self.model.set_time_step(self.original);
    }
}
