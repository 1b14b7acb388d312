//! Grid descriptors and the grid registry for Tether adapters.
//!
//! A grid describes the shape, spacing and origin that one or more model
//! variables are laid out on. Variable buffers are flattened in row-major
//! order over the grid's shape.
//!
//! # Topologies
//!
//! - [`GridTopology::Scalar`]: a single value
//! - [`GridTopology::Points`]: an unstructured list of nodes
//! - [`GridTopology::UniformRectilinear`]: a regular lattice with constant
//!   spacing per axis

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod registry;
pub mod topology;

pub use error::GridError;
pub use grid::{AxisVec, GridDescriptor};
pub use registry::GridRegistry;
pub use topology::GridTopology;
