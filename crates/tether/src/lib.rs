//! Tether: a standardized coupling adapter for time-stepping numerical models.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tether sub-crates. For most users, adding `tether` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tether::prelude::*;
//! use tether::models::{DiffusionConfig, PLATE_GRID, TEMPERATURE};
//!
//! let mut adapter = DiffusionAdapter::new();
//! adapter
//!     .initialize(DiffusionConfig { shape: [4, 5], ..Default::default() })
//!     .unwrap();
//! assert_eq!(adapter.get_grid_size(PLATE_GRID).unwrap(), 20);
//!
//! // A live handle sees every later update.
//! let temperature = adapter.get_value_ref(TEMPERATURE).unwrap();
//! adapter.set_value(TEMPERATURE, &[0.0; 20]).unwrap();
//! adapter.update_until(1.0).unwrap();
//! assert!(temperature.read().iter().all(|&t| t == 0.0));
//!
//! adapter.finalize().unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tether-core` | Grid ids, element types, `SharedBuffer`, `ModelError` |
//! | [`grid`] | `tether-grid` | Grid descriptors, topologies and the grid registry |
//! | [`model`] | `tether-model` | The `NumericalModel` and `CoupledModel` traits |
//! | [`models`] | `tether-models` | Reference models (plate diffusion) |
//! | [`adapter`] | `tether-adapter` | Lifecycle, time control, value exchange |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types shared by every crate (`tether-core`).
pub use tether_core as types;

/// Grid descriptors and registry (`tether-grid`).
pub use tether_grid as grid;

/// Model capability traits (`tether-model`).
///
/// Implement [`model::NumericalModel`] and [`model::CoupledModel`] to make
/// a model drivable by [`adapter::Adapter`].
pub use tether_model as model;

/// Reference models (`tether-models`).
pub use tether_models as models;

/// Lifecycle, time synchronization and value exchange (`tether-adapter`).
pub use tether_adapter as adapter;

/// [`adapter::Adapter`] wrapping the reference plate diffusion model.
pub type DiffusionAdapter = tether_adapter::Adapter<tether_models::Diffusion>;

/// Common imports for typical Tether usage.
///
/// ```rust
/// use tether::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tether_core::{ElementType, GridId, ModelError, SharedBuffer, VariableSpec};

    // Grids
    pub use tether_grid::{GridDescriptor, GridError, GridTopology};

    // Model traits
    pub use tether_model::{CoupledModel, NumericalModel};

    // Adapter
    pub use tether_adapter::{
        Adapter, AdapterConfig, AdapterError, LifecycleState, ModelAdapter, UpdateMetrics,
    };

    pub use crate::DiffusionAdapter;
}
