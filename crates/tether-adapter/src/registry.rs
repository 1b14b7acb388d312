//! The [`VariableRegistry`]: variable name -> descriptor.
//!
//! Built once at initialization from the names a model declares. Each
//! name's grid is fetched from the model on first use and registered in
//! the [`GridRegistry`], which records the variable as a member. After
//! construction the registry never changes shape; only the contents of
//! the live buffers do.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use tether_core::{ElementType, GridId, SharedBuffer};
use tether_grid::{GridError, GridRegistry};
use tether_model::NumericalModel;

use crate::error::AdapterError;

/// Location of values on the grid. Every Tether variable is node-centred.
pub const NODE_LOCATION: &str = "node";

/// Inconsistencies between a model's declared names and what it reports.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryError {
    /// A declared name has no variable in the model.
    UndeclaredVariable {
        /// The declared name.
        name: String,
    },
    /// A variable references a grid the model does not describe.
    MissingGrid {
        /// The variable.
        name: String,
        /// The grid it references.
        grid: GridId,
    },
    /// The model answered a grid query with a different grid id.
    GridIdMismatch {
        /// The id that was asked for.
        requested: GridId,
        /// The id on the returned descriptor.
        reported: GridId,
    },
    /// A variable's buffer length differs from its grid's node count.
    BufferSizeMismatch {
        /// The variable.
        name: String,
        /// Its grid.
        grid: GridId,
        /// Node count of the grid.
        expected: usize,
        /// Buffer length reported by the model.
        actual: usize,
    },
    /// A grid descriptor was rejected.
    Grid(GridError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredVariable { name } => {
                write!(f, "model does not provide declared variable '{name}'")
            }
            Self::MissingGrid { name, grid } => {
                write!(f, "variable '{name}' references undescribed grid {grid}")
            }
            Self::GridIdMismatch {
                requested,
                reported,
            } => write!(
                f,
                "model returned grid {reported} when asked for grid {requested}"
            ),
            Self::BufferSizeMismatch {
                name,
                grid,
                expected,
                actual,
            } => write!(
                f,
                "variable '{name}' has {actual} values but grid {grid} has {expected} nodes"
            ),
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for RegistryError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// Registered metadata and live buffer of one variable.
#[derive(Clone, Debug)]
pub struct VariableDescriptor {
    name: String,
    unit: String,
    grid: GridId,
    element_type: ElementType,
    element_count: usize,
    buffer: SharedBuffer,
}

impl VariableDescriptor {
    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit annotation.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Grid the variable lives on.
    pub fn grid(&self) -> GridId {
        self.grid
    }

    /// Element type tag.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Number of elements (equals the grid's node count).
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Size in bytes of one element.
    pub fn item_size(&self) -> usize {
        self.element_type.item_size()
    }

    /// Total size in bytes.
    pub fn nbytes(&self) -> usize {
        self.item_size() * self.element_count()
    }

    /// Where on the grid values are defined.
    pub fn location(&self) -> &'static str {
        NODE_LOCATION
    }

    /// The live buffer aliasing model state.
    pub fn buffer(&self) -> &SharedBuffer {
        &self.buffer
    }
}

/// Insertion-ordered registry of exchangeable variables.
#[derive(Clone, Debug, Default)]
pub struct VariableRegistry {
    variables: IndexMap<String, VariableDescriptor>,
}

impl VariableRegistry {
    /// Query `model` for every name in `names` and build the registry.
    ///
    /// Names are deduplicated, keeping first-seen order, so a variable that
    /// is both an input and an output is registered once. Grids are pulled
    /// from the model into `grids` as they are first referenced.
    pub fn build<'n, M, I>(
        model: &M,
        names: I,
        grids: &mut GridRegistry,
    ) -> Result<Self, RegistryError>
    where
        M: NumericalModel + ?Sized,
        I: IntoIterator<Item = &'n str>,
    {
        let mut variables = IndexMap::new();
        for name in names {
            if variables.contains_key(name) {
                continue;
            }
            let spec = model
                .variable(name)
                .ok_or_else(|| RegistryError::UndeclaredVariable {
                    name: name.to_string(),
                })?;

            if !grids.contains(spec.grid) {
                let grid = model
                    .grid(spec.grid)
                    .ok_or_else(|| RegistryError::MissingGrid {
                        name: name.to_string(),
                        grid: spec.grid,
                    })?;
                if grid.id() != spec.grid {
                    return Err(RegistryError::GridIdMismatch {
                        requested: spec.grid,
                        reported: grid.id(),
                    });
                }
                grids.insert(grid)?;
            }

            let expected = grids.grid_size(spec.grid)?;
            if spec.buffer.len() != expected {
                return Err(RegistryError::BufferSizeMismatch {
                    name: name.to_string(),
                    grid: spec.grid,
                    expected,
                    actual: spec.buffer.len(),
                });
            }
            grids.add_member(spec.grid, name)?;

            variables.insert(
                name.to_string(),
                VariableDescriptor {
                    name: name.to_string(),
                    unit: spec.unit,
                    grid: spec.grid,
                    element_type: spec.element_type,
                    element_count: expected,
                    buffer: spec.buffer,
                },
            );
        }
        Ok(Self { variables })
    }

    /// Descriptor for `name`.
    pub fn get(&self, name: &str) -> Result<&VariableDescriptor, AdapterError> {
        self.variables
            .get(name)
            .ok_or_else(|| AdapterError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Unit of `name`.
    pub fn variable_unit(&self, name: &str) -> Result<&str, AdapterError> {
        self.get(name).map(VariableDescriptor::unit)
    }

    /// Grid of `name`.
    pub fn variable_grid_id(&self, name: &str) -> Result<GridId, AdapterError> {
        self.get(name).map(VariableDescriptor::grid)
    }

    /// Element count of `name`.
    pub fn variable_element_count(&self, name: &str) -> Result<usize, AdapterError> {
        self.get(name).map(VariableDescriptor::element_count)
    }

    /// Bytes per element of `name`.
    pub fn variable_item_size(&self, name: &str) -> Result<usize, AdapterError> {
        self.get(name).map(VariableDescriptor::item_size)
    }

    /// Element type of `name`.
    pub fn variable_type(&self, name: &str) -> Result<ElementType, AdapterError> {
        self.get(name).map(VariableDescriptor::element_type)
    }

    /// Total bytes of `name`.
    pub fn variable_nbytes(&self, name: &str) -> Result<usize, AdapterError> {
        self.get(name).map(VariableDescriptor::nbytes)
    }

    /// Grid location of `name`.
    pub fn variable_location(&self, name: &str) -> Result<&'static str, AdapterError> {
        self.get(name).map(VariableDescriptor::location)
    }
}
