//! Numerical model capability traits for Tether adapters.
//!
//! A coupled model implements [`NumericalModel`] (how to advance it and
//! where its state lives) and [`CoupledModel`] (its fixed names and how to
//! build it from a config). The adapter needs nothing else.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod model;

pub use model::{CoupledModel, NumericalModel};
