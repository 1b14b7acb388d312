//! The adapter error taxonomy.
//!
//! Every failure a driver can observe maps to one named variant, so a
//! coupling driver can tell a bad identifier from a diverged solver from a
//! request to move time backwards.

use std::error::Error;
use std::fmt;

use tether_core::{GridId, ModelError};
use tether_grid::GridError;

use crate::adapter::LifecycleState;
use crate::registry::RegistryError;

/// Errors returned by [`Adapter`](crate::Adapter) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum AdapterError {
    /// The operation needs an initialized adapter.
    Uninitialized {
        /// Lifecycle state at the time of the call.
        state: LifecycleState,
    },
    /// `initialize` was called on an adapter that has left `Uninitialized`.
    AlreadyInitialized {
        /// Lifecycle state at the time of the call.
        state: LifecycleState,
    },
    /// The wrapped model could not be built from its config.
    ModelConstruction(ModelError),
    /// The model's variable or grid declarations are inconsistent.
    Registry(RegistryError),
    /// No variable with this name is registered.
    UnknownVariable {
        /// The requested name.
        name: String,
    },
    /// No grid with this id is registered.
    UnknownGrid {
        /// The requested id.
        grid: GridId,
    },
    /// A write supplied the wrong number of values.
    ShapeMismatch {
        /// Target variable.
        name: String,
        /// Number of values required.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A flat index lies outside the variable's buffer.
    IndexOutOfBounds {
        /// Target variable.
        name: String,
        /// The offending index.
        index: usize,
        /// Number of elements in the variable.
        len: usize,
    },
    /// The variable's live buffer is borrowed through a handle, so it can
    /// be neither read nor written right now.
    BufferBorrowed {
        /// Target variable.
        name: String,
    },
    /// A fractional update was requested with a non-positive or
    /// non-finite fraction.
    InvalidFraction {
        /// The rejected fraction.
        value: f64,
    },
    /// The model's time step is non-positive or non-finite.
    InvalidTimeStep {
        /// The rejected step.
        value: f64,
    },
    /// A target or model time is not finite.
    InvalidTime {
        /// The rejected time.
        value: f64,
    },
    /// The target time lies behind the model's current time.
    TimeOrder {
        /// Requested target time.
        target: f64,
        /// Model time at the call.
        current: f64,
    },
    /// The model failed while advancing.
    Model(ModelError),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized { state } => match state {
                LifecycleState::Finalized => write!(f, "adapter has been finalized"),
                _ => write!(f, "adapter is not initialized"),
            },
            Self::AlreadyInitialized { state } => match state {
                LifecycleState::Finalized => {
                    write!(f, "adapter was finalized and cannot be re-initialized")
                }
                _ => write!(f, "adapter is already initialized"),
            },
            Self::ModelConstruction(e) => write!(f, "model construction failed: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::UnknownVariable { name } => write!(f, "unknown variable '{name}'"),
            Self::UnknownGrid { grid } => write!(f, "unknown grid {grid}"),
            Self::ShapeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "variable '{name}' expects {expected} values, got {actual}"
            ),
            Self::IndexOutOfBounds { name, index, len } => write!(
                f,
                "index {index} out of bounds for variable '{name}' of length {len}"
            ),
            Self::BufferBorrowed { name } => write!(
                f,
                "variable '{name}' is borrowed through a live handle"
            ),
            Self::InvalidFraction { value } => {
                write!(f, "time fraction must be finite and positive, got {value}")
            }
            Self::InvalidTimeStep { value } => {
                write!(f, "time step must be finite and positive, got {value}")
            }
            Self::InvalidTime { value } => write!(f, "time must be finite, got {value}"),
            Self::TimeOrder { target, current } => write!(
                f,
                "target time {target} is behind current time {current}"
            ),
            Self::Model(e) => write!(f, "model error: {e}"),
        }
    }
}

impl Error for AdapterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ModelConstruction(e) | Self::Model(e) => Some(e),
            Self::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for AdapterError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<GridError> for AdapterError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::UnknownGrid { grid } => Self::UnknownGrid { grid },
            other => Self::Registry(RegistryError::Grid(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_messages_name_the_state() {
        let finalized = AdapterError::Uninitialized {
            state: LifecycleState::Finalized,
        };
        assert!(finalized.to_string().contains("finalized"));
        let fresh = AdapterError::Uninitialized {
            state: LifecycleState::Uninitialized,
        };
        assert!(fresh.to_string().contains("not initialized"));
    }

    #[test]
    fn unknown_grid_maps_from_grid_error() {
        let err: AdapterError = GridError::UnknownGrid { grid: GridId(4) }.into();
        assert_eq!(err, AdapterError::UnknownGrid { grid: GridId(4) });

        let err: AdapterError = GridError::DuplicateGrid { grid: GridId(4) }.into();
        assert!(matches!(
            err,
            AdapterError::Registry(RegistryError::Grid(GridError::DuplicateGrid { .. }))
        ));
    }

    #[test]
    fn model_error_is_source() {
        let err = AdapterError::Model(ModelError::ExecutionFailed {
            reason: "diverged".into(),
        });
        let source = err.source().expect("model error chained");
        assert!(source.to_string().contains("diverged"));
        assert!(AdapterError::InvalidFraction { value: 0.0 }.source().is_none());
    }

    #[test]
    fn time_order_display() {
        let msg = AdapterError::TimeOrder {
            target: 1.0,
            current: 2.0,
        }
        .to_string();
        assert_eq!(msg, "target time 1 is behind current time 2");
    }
}
