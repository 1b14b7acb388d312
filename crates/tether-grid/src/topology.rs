//! Grid topology classification.

use std::fmt;

/// Topological type of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridTopology {
    /// A single value with no spatial extent.
    Scalar,
    /// Nodes with no implied connectivity.
    Points,
    /// A regular lattice: constant spacing along each axis.
    UniformRectilinear,
}

impl GridTopology {
    /// Canonical name reported to coupling drivers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Points => "points",
            Self::UniformRectilinear => "uniform_rectilinear_grid",
        }
    }
}

impl fmt::Display for GridTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(GridTopology::Scalar.as_str(), "scalar");
        assert_eq!(GridTopology::Points.as_str(), "points");
        assert_eq!(
            GridTopology::UniformRectilinear.to_string(),
            "uniform_rectilinear_grid"
        );
    }
}
