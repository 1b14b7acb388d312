//! Error types for grid construction and lookup.

use std::fmt;
use tether_core::GridId;

/// Errors arising from grid construction or registry lookups.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A grid was declared with no axes.
    ZeroRank {
        /// The offending grid.
        grid: GridId,
    },
    /// Shape, spacing and origin disagree on the number of axes.
    RankMismatch {
        /// The offending grid.
        grid: GridId,
        /// Length of the shape vector.
        shape: usize,
        /// Length of the spacing vector.
        spacing: usize,
        /// Length of the origin vector.
        origin: usize,
    },
    /// An axis has zero nodes.
    EmptyDimension {
        /// The offending grid.
        grid: GridId,
        /// Index of the empty axis.
        axis: usize,
    },
    /// An axis spacing is zero, negative, or not finite.
    InvalidSpacing {
        /// The offending grid.
        grid: GridId,
        /// Index of the axis.
        axis: usize,
        /// The rejected spacing.
        value: f64,
    },
    /// An origin coordinate is not finite.
    InvalidOrigin {
        /// The offending grid.
        grid: GridId,
        /// Index of the axis.
        axis: usize,
        /// The rejected origin coordinate.
        value: f64,
    },
    /// The product of the shape does not fit in `usize`.
    SizeOverflow {
        /// The offending grid.
        grid: GridId,
    },
    /// A grid with this id is already registered.
    DuplicateGrid {
        /// The duplicated id.
        grid: GridId,
    },
    /// No grid with this id is registered.
    UnknownGrid {
        /// The requested id.
        grid: GridId,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRank { grid } => write!(f, "grid {grid} has rank 0"),
            Self::RankMismatch {
                grid,
                shape,
                spacing,
                origin,
            } => write!(
                f,
                "grid {grid}: shape/spacing/origin lengths differ ({shape}/{spacing}/{origin})"
            ),
            Self::EmptyDimension { grid, axis } => {
                write!(f, "grid {grid}: axis {axis} has zero nodes")
            }
            Self::InvalidSpacing { grid, axis, value } => {
                write!(
                    f,
                    "grid {grid}: spacing on axis {axis} must be finite and positive, got {value}"
                )
            }
            Self::InvalidOrigin { grid, axis, value } => {
                write!(f, "grid {grid}: origin on axis {axis} must be finite, got {value}")
            }
            Self::SizeOverflow { grid } => write!(f, "grid {grid}: node count overflows usize"),
            Self::DuplicateGrid { grid } => write!(f, "grid {grid} is already registered"),
            Self::UnknownGrid { grid } => write!(f, "unknown grid {grid}"),
        }
    }
}

impl std::error::Error for GridError {}
