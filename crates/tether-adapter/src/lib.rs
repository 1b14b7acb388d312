//! Lifecycle, time synchronization and value exchange for coupled models.
//!
//! [`Adapter`] wraps any [`CoupledModel`](tether_model::CoupledModel) behind
//! the fixed [`ModelAdapter`] naming contract, so a coupling driver can
//! advance, query and exchange state without knowing the model.
//!
//! # Components
//!
//! - [`TimeController`]: whole, fractional and until-target advancement
//! - [`VariableRegistry`]: name -> unit, grid, element type, live buffer
//! - [`ValueExchange`]: aliasing reads, snapshot reads and in-place writes
//! - [`StepGuard`]: scoped time-step perturbation with guaranteed restore

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod exchange;
pub mod guard;
pub mod metrics;
pub mod registry;
pub mod time;

pub use adapter::{Adapter, LifecycleState, ModelAdapter, END_TIME, START_TIME, TIME_UNITS};
pub use config::{AdapterConfig, ConfigError};
pub use error::AdapterError;
pub use exchange::ValueExchange;
pub use guard::StepGuard;
pub use metrics::UpdateMetrics;
pub use registry::{RegistryError, VariableDescriptor, VariableRegistry, NODE_LOCATION};
pub use time::{StepPlan, TimeController, DEFAULT_TIME_EPSILON};
