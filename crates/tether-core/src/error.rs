//! Error type surfaced by numerical models.

use std::error::Error;
use std::fmt;

/// Failures raised by a numerical model, either while it is being built
/// or while it advances.
///
/// The adapter never inspects or recovers from these; it wraps them so a
/// coupling driver can tell a solver failure apart from misuse of the
/// adapter itself.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// The model configuration was rejected during construction.
    InvalidConfig {
        /// Description of the offending setting.
        reason: String,
    },
    /// The model's advance failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A non-finite value appeared in model state (the solver diverged).
    NanDetected {
        /// Variable containing the non-finite value.
        variable: String,
        /// Flat index of the first offending cell, if known.
        cell_index: Option<usize>,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid model config: {reason}"),
            Self::ExecutionFailed { reason } => write!(f, "model execution failed: {reason}"),
            Self::NanDetected {
                variable,
                cell_index,
            } => {
                write!(f, "non-finite value in '{variable}'")?;
                if let Some(idx) = cell_index {
                    write!(f, " at cell {idx}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ModelError {}
