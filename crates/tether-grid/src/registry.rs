//! The [`GridRegistry`]: grid id -> descriptor, built once per session.

use indexmap::IndexMap;
use tether_core::GridId;

use crate::error::GridError;
use crate::grid::GridDescriptor;
use crate::topology::GridTopology;

/// Insertion-ordered registry of the grids a model exposes.
///
/// Built by the adapter during initialization and never reshaped
/// afterwards; only member lists grow while variables are registered.
/// Every lookup fails with [`GridError::UnknownGrid`] for unregistered ids.
#[derive(Clone, Debug, Default)]
pub struct GridRegistry {
    grids: IndexMap<GridId, GridDescriptor>,
}

impl GridRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid. Ids must be unique.
    pub fn insert(&mut self, grid: GridDescriptor) -> Result<(), GridError> {
        let id = grid.id();
        if self.grids.contains_key(&id) {
            return Err(GridError::DuplicateGrid { grid: id });
        }
        self.grids.insert(id, grid);
        Ok(())
    }

    /// Attach `variable` to the member list of grid `id`.
    pub fn add_member(&mut self, id: GridId, variable: &str) -> Result<(), GridError> {
        let grid = self
            .grids
            .get_mut(&id)
            .ok_or(GridError::UnknownGrid { grid: id })?;
        grid.add_member(variable);
        Ok(())
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: GridId) -> bool {
        self.grids.contains_key(&id)
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: GridId) -> Result<&GridDescriptor, GridError> {
        self.grids.get(&id).ok_or(GridError::UnknownGrid { grid: id })
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = GridId> + '_ {
        self.grids.keys().copied()
    }

    /// Number of registered grids.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Returns `true` if no grids are registered.
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Topology of grid `id`.
    pub fn grid_topology(&self, id: GridId) -> Result<GridTopology, GridError> {
        self.get(id).map(GridDescriptor::topology)
    }

    /// Rank of grid `id`.
    pub fn grid_rank(&self, id: GridId) -> Result<usize, GridError> {
        self.get(id).map(GridDescriptor::rank)
    }

    /// Shape of grid `id`.
    pub fn grid_shape(&self, id: GridId) -> Result<&[usize], GridError> {
        self.get(id).map(GridDescriptor::shape)
    }

    /// Spacing of grid `id`.
    pub fn grid_spacing(&self, id: GridId) -> Result<&[f64], GridError> {
        self.get(id).map(GridDescriptor::spacing)
    }

    /// Origin of grid `id`.
    pub fn grid_origin(&self, id: GridId) -> Result<&[f64], GridError> {
        self.get(id).map(GridDescriptor::origin)
    }

    /// Node count of grid `id` (product of its shape).
    pub fn grid_size(&self, id: GridId) -> Result<usize, GridError> {
        self.get(id).map(GridDescriptor::size)
    }

    /// Member variable names of grid `id`, in registration order.
    pub fn grid_members(&self, id: GridId) -> Result<Vec<&str>, GridError> {
        self.get(id).map(|g| g.members().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> GridRegistry {
        let mut reg = GridRegistry::new();
        reg.insert(
            GridDescriptor::uniform_rectilinear(GridId(0), &[4, 5], &[0.5, 0.25], &[1.0, 2.0])
                .unwrap(),
        )
        .unwrap();
        reg.insert(GridDescriptor::scalar(GridId(3))).unwrap();
        reg
    }

    #[test]
    fn lookups_report_descriptor_values() {
        let reg = registry();
        let g = GridId(0);
        assert_eq!(reg.grid_topology(g), Ok(GridTopology::UniformRectilinear));
        assert_eq!(reg.grid_rank(g), Ok(2));
        assert_eq!(reg.grid_size(g), Ok(20));
        assert_eq!(reg.grid_shape(g), Ok(&[4usize, 5][..]));
        assert_eq!(reg.grid_spacing(g), Ok(&[0.5, 0.25][..]));
        assert_eq!(reg.grid_origin(g), Ok(&[1.0, 2.0][..]));
    }

    #[test]
    fn unknown_grid_fails_every_lookup() {
        let reg = registry();
        let missing = GridId(9);
        let expected = GridError::UnknownGrid { grid: missing };
        assert_eq!(reg.grid_topology(missing), Err(expected.clone()));
        assert_eq!(reg.grid_rank(missing), Err(expected.clone()));
        assert_eq!(reg.grid_size(missing), Err(expected.clone()));
        assert_eq!(reg.grid_shape(missing), Err(expected.clone()));
        assert_eq!(reg.grid_spacing(missing), Err(expected.clone()));
        assert_eq!(reg.grid_origin(missing), Err(expected.clone()));
        assert_eq!(reg.grid_members(missing), Err(expected));
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut reg = registry();
        assert_eq!(
            reg.insert(GridDescriptor::scalar(GridId(3))),
            Err(GridError::DuplicateGrid { grid: GridId(3) })
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn members_attach_in_order_without_duplicates() {
        let mut reg = registry();
        reg.add_member(GridId(0), "temperature").unwrap();
        reg.add_member(GridId(0), "pressure").unwrap();
        reg.add_member(GridId(0), "temperature").unwrap();
        assert_eq!(
            reg.grid_members(GridId(0)),
            Ok(vec!["temperature", "pressure"])
        );
        assert_eq!(
            reg.add_member(GridId(7), "x"),
            Err(GridError::UnknownGrid { grid: GridId(7) })
        );
    }

    #[test]
    fn ids_in_registration_order() {
        let reg = registry();
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec![GridId(0), GridId(3)]);
        assert!(reg.contains(GridId(3)));
        assert!(!reg.contains(GridId(1)));
        assert!(!reg.is_empty());
    }
}
