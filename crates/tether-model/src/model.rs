//! The [`NumericalModel`] and [`CoupledModel`] traits.

use tether_core::{GridId, ModelError, VariableSpec};
use tether_grid::GridDescriptor;

/// A time-stepping simulation component, as seen by the adapter.
///
/// # Contract
///
/// - [`advance()`](Self::advance) mutates state by one solver step of the
///   current [`time_step()`](Self::time_step) and increments
///   [`time()`](Self::time) by that step.
/// - [`set_time_step()`](Self::set_time_step) changes the step used by the
///   next advance. The adapter perturbs it temporarily for fractional
///   steps and always restores it.
/// - [`variable()`](Self::variable) returns buffers that alias live state,
///   never copies. The adapter queries each declared name once.
///
/// # Examples
///
/// A model whose single value grows by `dt` every step:
///
/// ```
/// use tether_core::{GridId, ModelError, SharedBuffer, VariableSpec};
/// use tether_grid::GridDescriptor;
/// use tether_model::NumericalModel;
///
/// struct Clock {
///     time: f64,
///     dt: f64,
///     elapsed: SharedBuffer,
/// }
///
/// impl NumericalModel for Clock {
///     fn advance(&mut self) -> Result<(), ModelError> {
///         self.elapsed.write()[0] += self.dt;
///         self.time += self.dt;
///         Ok(())
///     }
///     fn time(&self) -> f64 { self.time }
///     fn time_step(&self) -> f64 { self.dt }
///     fn set_time_step(&mut self, dt: f64) { self.dt = dt; }
///     fn variable(&self, name: &str) -> Option<VariableSpec> {
///         (name == "clock__elapsed")
///             .then(|| VariableSpec::float64("s", GridId(0), self.elapsed.clone()))
///     }
///     fn grid(&self, grid: GridId) -> Option<GridDescriptor> {
///         (grid == GridId(0)).then(|| GridDescriptor::scalar(grid))
///     }
/// }
///
/// let mut clock = Clock { time: 0.0, dt: 0.5, elapsed: SharedBuffer::zeros(1) };
/// clock.advance().unwrap();
/// assert_eq!(clock.time(), 0.5);
/// ```
pub trait NumericalModel {
    /// Advance the model by one step of the current time step.
    fn advance(&mut self) -> Result<(), ModelError>;

    /// Current model time.
    fn time(&self) -> f64;

    /// Step used by the next [`advance()`](Self::advance).
    fn time_step(&self) -> f64;

    /// Replace the step used by subsequent advances.
    fn set_time_step(&mut self, dt: f64);

    /// Describe the variable `name`, or `None` if the model has no such
    /// variable.
    fn variable(&self, name: &str) -> Option<VariableSpec>;

    /// Describe grid `grid`, or `None` if the model has no such grid.
    fn grid(&self, grid: GridId) -> Option<GridDescriptor>;
}

/// Fixed declarations that let a model be driven by the generic adapter.
///
/// Component and variable names are compile-time constants so a driver can
/// inspect them before the model exists.
pub trait CoupledModel: NumericalModel + Sized {
    /// Model-specific configuration, forwarded verbatim by the adapter.
    type Config;

    /// Human-readable component name.
    const COMPONENT_NAME: &'static str;

    /// Variables a driver may write.
    const INPUT_VAR_NAMES: &'static [&'static str];

    /// Variables a driver may read.
    const OUTPUT_VAR_NAMES: &'static [&'static str];

    /// Construct the model from `config`.
    fn build(config: Self::Config) -> Result<Self, ModelError>;
}
