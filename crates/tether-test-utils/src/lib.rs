//! Test utilities and mock models for Tether development.
//!
//! Provides [`RampModel`], a deterministic model whose state changes in
//! an easily predicted way, plus knobs for injecting failures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{RampConfig, RampModel, CLOCK_GRID, ELAPSED, LEVEL, RAMP_GRID, RATE};
