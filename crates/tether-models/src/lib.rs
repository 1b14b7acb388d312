//! Reference numerical models for Tether adapters.
//!
//! # Models
//!
//! - [`Diffusion`]: explicit 2-D heat diffusion on a rectangular plate
//!   with fixed-temperature edges. Exposes `plate_surface__temperature`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diffusion;

pub use diffusion::{Diffusion, DiffusionBuilder, DiffusionConfig, PLATE_GRID, TEMPERATURE};
