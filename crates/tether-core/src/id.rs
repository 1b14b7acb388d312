//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a grid within a coupled model.
///
/// Grids are declared by the model and registered at adapter
/// initialization. Several variables may share one grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(pub u32);

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GridId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
