//! The [`GridDescriptor`] type and row-major index helpers.

use indexmap::IndexSet;
use smallvec::SmallVec;
use tether_core::GridId;

use crate::error::GridError;
use crate::topology::GridTopology;

/// Per-axis vector. Inline for grids up to 4 dimensions, which covers
/// every topology Tether models declare; higher ranks spill to the heap.
pub type AxisVec<T> = SmallVec<[T; 4]>;

/// Geometric and topological description of a grid.
///
/// Invariant: `shape`, `spacing` and `origin` all have length
/// [`rank()`](Self::rank) `>= 1`, every shape entry is at least 1, and
/// [`size()`](Self::size) fits in `usize`. Axis 0 is the slowest-varying
/// axis of the row-major layout.
///
/// Member variables are attached by the [`GridRegistry`](crate::GridRegistry)
/// as variables referencing this grid are registered.
#[derive(Clone, Debug, PartialEq)]
pub struct GridDescriptor {
    id: GridId,
    topology: GridTopology,
    shape: AxisVec<usize>,
    spacing: AxisVec<f64>,
    origin: AxisVec<f64>,
    size: usize,
    members: IndexSet<String>,
}

impl GridDescriptor {
    /// Create and validate a grid description.
    pub fn new(
        id: GridId,
        topology: GridTopology,
        shape: &[usize],
        spacing: &[f64],
        origin: &[f64],
    ) -> Result<Self, GridError> {
        if shape.is_empty() {
            return Err(GridError::ZeroRank { grid: id });
        }
        if shape.len() != spacing.len() || shape.len() != origin.len() {
            return Err(GridError::RankMismatch {
                grid: id,
                shape: shape.len(),
                spacing: spacing.len(),
                origin: origin.len(),
            });
        }
        for (axis, &n) in shape.iter().enumerate() {
            if n == 0 {
                return Err(GridError::EmptyDimension { grid: id, axis });
            }
        }
        for (axis, &dx) in spacing.iter().enumerate() {
            if !dx.is_finite() || dx <= 0.0 {
                return Err(GridError::InvalidSpacing {
                    grid: id,
                    axis,
                    value: dx,
                });
            }
        }
        for (axis, &x0) in origin.iter().enumerate() {
            if !x0.is_finite() {
                return Err(GridError::InvalidOrigin {
                    grid: id,
                    axis,
                    value: x0,
                });
            }
        }
        let size = shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or(GridError::SizeOverflow { grid: id })?;

        Ok(Self {
            id,
            topology,
            shape: SmallVec::from_slice(shape),
            spacing: SmallVec::from_slice(spacing),
            origin: SmallVec::from_slice(origin),
            size,
            members: IndexSet::new(),
        })
    }

    /// A regular lattice with constant `spacing` per axis.
    pub fn uniform_rectilinear(
        id: GridId,
        shape: &[usize],
        spacing: &[f64],
        origin: &[f64],
    ) -> Result<Self, GridError> {
        Self::new(id, GridTopology::UniformRectilinear, shape, spacing, origin)
    }

    /// A single-node grid for scalar quantities.
    pub fn scalar(id: GridId) -> Self {
        Self {
            id,
            topology: GridTopology::Scalar,
            shape: SmallVec::from_slice(&[1]),
            spacing: SmallVec::from_slice(&[1.0]),
            origin: SmallVec::from_slice(&[0.0]),
            size: 1,
            members: IndexSet::new(),
        }
    }

    /// An unstructured list of `count` nodes.
    pub fn points(id: GridId, count: usize) -> Result<Self, GridError> {
        Self::new(id, GridTopology::Points, &[count], &[1.0], &[0.0])
    }

    /// Grid identifier.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Topological type.
    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Nodes per axis, slowest-varying first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Node spacing per axis.
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Coordinates of the first node, per axis.
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Total node count (product of the shape).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Names of the variables defined on this grid, in registration order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// Record `name` as a member variable. Returns `false` if it already was.
    pub(crate) fn add_member(&mut self, name: &str) -> bool {
        self.members.insert(name.to_string())
    }

    /// Row-major flat index of a multi-dimensional node index.
    ///
    /// Returns `None` if `index` has the wrong rank or is out of bounds.
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.rank() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &n) in index.iter().zip(self.shape.iter()) {
            if i >= n {
                return None;
            }
            flat = flat * n + i;
        }
        Some(flat)
    }
}
