//! The generic [`Adapter`] and the fixed [`ModelAdapter`] contract.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Initialized --finalize--> Finalized
//! ```
//!
//! The lifecycle is linear. `initialize` builds the model and its
//! registries; every query, update and exchange needs an initialized
//! adapter; `finalize` drops the model. A finalized adapter cannot be
//! initialized again. The component name, variable name lists and time
//! units are compile-time constants and answer in any state.
//!
//! # Threading
//!
//! `Adapter` holds [`SharedBuffer`] handles and is therefore neither
//! [`Send`] nor [`Sync`]. Drivers run on one thread and never observe a
//! model mid-update.

use std::fmt;
use std::time::Instant;

use log::debug;
use tether_core::{ElementType, GridId, SharedBuffer};
use tether_grid::{GridRegistry, GridTopology};
use tether_model::CoupledModel;

use crate::config::{AdapterConfig, ConfigError};
use crate::error::AdapterError;
use crate::exchange::ValueExchange;
use crate::metrics::UpdateMetrics;
use crate::registry::VariableRegistry;
use crate::time::{StepPlan, TimeController};

/// Model time at which every adapter session starts.
pub const START_TIME: f64 = 0.0;

/// Latest time a model may be advanced to.
pub const END_TIME: f64 = f64::MAX;

/// Units of model time. Tether models are dimensionless in time.
pub const TIME_UNITS: &str = "-";

// ── LifecycleState ──────────────────────────────────────────────

/// Where an adapter is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created, no model yet.
    Uninitialized,
    /// Model built; queries, updates and exchange are valid.
    Initialized,
    /// Model dropped. Terminal.
    Finalized,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initialized => write!(f, "initialized"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

// ── ModelAdapter ────────────────────────────────────────────────

/// The fixed operation names a coupling driver programs against.
///
/// Grid ids and variable names come from the wrapped model's declarations.
/// Unless noted otherwise every method fails
/// [`AdapterError::Uninitialized`] outside the `Initialized` state.
pub trait ModelAdapter {
    /// Configuration forwarded verbatim to the model's constructor.
    type Config;

    /// Build the model and register its variables and grids.
    fn initialize(&mut self, config: Self::Config) -> Result<(), AdapterError>;

    /// Advance by one native step.
    fn update(&mut self) -> Result<(), AdapterError>;

    /// Advance by `time_frac` of a native step.
    fn update_frac(&mut self, time_frac: f64) -> Result<(), AdapterError>;

    /// Advance until the model reaches `time`.
    fn update_until(&mut self, time: f64) -> Result<(), AdapterError>;

    /// Drop the model and registries.
    fn finalize(&mut self) -> Result<(), AdapterError>;

    /// Human-readable model name. Valid in any state.
    fn get_component_name(&self) -> &'static str;

    /// Names the model reads from the driver. Valid in any state.
    fn get_input_var_names(&self) -> &'static [&'static str];

    /// Names the model exposes to the driver. Valid in any state.
    fn get_output_var_names(&self) -> &'static [&'static str];

    /// Element type of `name`.
    fn get_var_type(&self, name: &str) -> Result<ElementType, AdapterError>;

    /// Unit annotation of `name`.
    fn get_var_units(&self, name: &str) -> Result<&str, AdapterError>;

    /// Total bytes occupied by `name`.
    fn get_var_nbytes(&self, name: &str) -> Result<usize, AdapterError>;

    /// Bytes per element of `name`.
    fn get_var_itemsize(&self, name: &str) -> Result<usize, AdapterError>;

    /// Grid location of the values of `name`.
    fn get_var_location(&self, name: &str) -> Result<&'static str, AdapterError>;

    /// Grid that `name` lives on.
    fn get_var_grid(&self, name: &str) -> Result<GridId, AdapterError>;

    /// Number of dimensions of `grid`.
    fn get_grid_rank(&self, grid: GridId) -> Result<usize, AdapterError>;

    /// Number of nodes of `grid`.
    fn get_grid_size(&self, grid: GridId) -> Result<usize, AdapterError>;

    /// Nodes per axis of `grid`.
    fn get_grid_shape(&self, grid: GridId) -> Result<&[usize], AdapterError>;

    /// Node spacing per axis of `grid`.
    fn get_grid_spacing(&self, grid: GridId) -> Result<&[f64], AdapterError>;

    /// Coordinates of the first node of `grid`.
    fn get_grid_origin(&self, grid: GridId) -> Result<&[f64], AdapterError>;

    /// Topology of `grid`.
    fn get_grid_type(&self, grid: GridId) -> Result<GridTopology, AdapterError>;

    /// Independent copy of the values of `name`.
    fn get_value(&self, name: &str) -> Result<Vec<f64>, AdapterError>;

    /// Handle aliasing the live values of `name`.
    fn get_value_ref(&self, name: &str) -> Result<SharedBuffer, AdapterError>;

    /// Overwrite all values of `name` in place.
    fn set_value(&mut self, name: &str, values: &[f64]) -> Result<(), AdapterError>;

    /// Values of `name` at the given flat indices.
    fn get_value_at_indices(&self, name: &str, indices: &[usize])
        -> Result<Vec<f64>, AdapterError>;

    /// Write `values[k]` at flat index `indices[k]` of `name`.
    fn set_value_at_indices(
        &mut self,
        name: &str,
        indices: &[usize],
        values: &[f64],
    ) -> Result<(), AdapterError>;

    /// Model start time, [`START_TIME`].
    fn get_start_time(&self) -> Result<f64, AdapterError>;

    /// Model end time, [`END_TIME`].
    fn get_end_time(&self) -> Result<f64, AdapterError>;

    /// Current model time.
    fn get_current_time(&self) -> Result<f64, AdapterError>;

    /// Native step of the model.
    fn get_time_step(&self) -> Result<f64, AdapterError>;

    /// Units of model time, [`TIME_UNITS`]. Valid in any state.
    fn get_time_units(&self) -> &'static str;
}

// ── Adapter ─────────────────────────────────────────────────────

struct Session<M> {
    model: M,
    variables: VariableRegistry,
    grids: GridRegistry,
    metrics: UpdateMetrics,
}

enum Lifecycle<M> {
    Uninitialized,
    Initialized(Box<Session<M>>),
    Finalized,
}

/// Standard adapter around any [`CoupledModel`].
///
/// # Examples
///
/// ```
/// use tether_adapter::{Adapter, LifecycleState, ModelAdapter};
/// use tether_test_utils::{RampConfig, RampModel, LEVEL};
///
/// let mut adapter: Adapter<RampModel> = Adapter::new();
/// adapter.initialize(RampConfig::new(&[4, 5], 0.1)).unwrap();
/// adapter.update_until(0.25).unwrap();
/// assert!((adapter.get_current_time().unwrap() - 0.25).abs() < 1e-9);
/// assert_eq!(adapter.get_value(LEVEL).unwrap().len(), 20);
///
/// adapter.finalize().unwrap();
/// assert_eq!(adapter.state(), LifecycleState::Finalized);
/// ```
pub struct Adapter<M: CoupledModel> {
    config: AdapterConfig,
    lifecycle: Lifecycle<M>,
}

impl<M: CoupledModel> Adapter<M> {
    /// Create an uninitialized adapter with the default [`AdapterConfig`].
    pub fn new() -> Self {
        Self {
            config: AdapterConfig::default(),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Create an uninitialized adapter with custom settings.
    pub fn with_config(config: AdapterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            lifecycle: Lifecycle::Uninitialized,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        match self.lifecycle {
            Lifecycle::Uninitialized => LifecycleState::Uninitialized,
            Lifecycle::Initialized(_) => LifecycleState::Initialized,
            Lifecycle::Finalized => LifecycleState::Finalized,
        }
    }

    /// Adapter settings.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Update counters for the current session.
    pub fn metrics(&self) -> Result<&UpdateMetrics, AdapterError> {
        Ok(&self.session()?.metrics)
    }

    /// The wrapped model.
    pub fn model(&self) -> Result<&M, AdapterError> {
        Ok(&self.session()?.model)
    }

    /// Registered variables.
    pub fn variables(&self) -> Result<&VariableRegistry, AdapterError> {
        Ok(&self.session()?.variables)
    }

    /// Registered grids.
    pub fn grids(&self) -> Result<&GridRegistry, AdapterError> {
        Ok(&self.session()?.grids)
    }

    /// Name-keyed value exchange over the registered variables.
    pub fn exchange(&self) -> Result<ValueExchange<'_>, AdapterError> {
        Ok(ValueExchange::new(&self.session()?.variables))
    }

    /// Plan an `update_until(time)` without advancing.
    pub fn plan_until(&mut self, time: f64) -> Result<StepPlan, AdapterError> {
        let epsilon = self.config.time_epsilon;
        let session = self.session_mut()?;
        TimeController::new(&mut session.model, &mut session.metrics, epsilon).plan(time)
    }

    fn session(&self) -> Result<&Session<M>, AdapterError> {
        match &self.lifecycle {
            Lifecycle::Initialized(session) => Ok(session.as_ref()),
            _ => Err(AdapterError::Uninitialized {
                state: self.state(),
            }),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session<M>, AdapterError> {
        let state = self.state();
        match &mut self.lifecycle {
            Lifecycle::Initialized(session) => Ok(session.as_mut()),
            _ => Err(AdapterError::Uninitialized { state }),
        }
    }

    /// Run `op` on a time controller and record its wall time.
    fn timed_update<T>(
        &mut self,
        op: impl FnOnce(&mut TimeController<'_, M>) -> Result<T, AdapterError>,
    ) -> Result<T, AdapterError> {
        let epsilon = self.config.time_epsilon;
        let session = self.session_mut()?;
        let start = Instant::now();
        let result = {
            let mut ctl = TimeController::new(&mut session.model, &mut session.metrics, epsilon);
            op(&mut ctl)
        };
        session.metrics.last_update_us =
            u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        result
    }
}

impl<M: CoupledModel> Default for Adapter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: CoupledModel> fmt::Debug for Adapter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("component", &M::COMPONENT_NAME)
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<M: CoupledModel> ModelAdapter for Adapter<M> {
    type Config = M::Config;

    fn initialize(&mut self, config: M::Config) -> Result<(), AdapterError> {
        let state = self.state();
        if state != LifecycleState::Uninitialized {
            return Err(AdapterError::AlreadyInitialized { state });
        }
        let model = M::build(config).map_err(AdapterError::ModelConstruction)?;
        let mut grids = GridRegistry::new();
        let names = M::INPUT_VAR_NAMES
            .iter()
            .chain(M::OUTPUT_VAR_NAMES)
            .copied();
        let variables = VariableRegistry::build(&model, names, &mut grids)?;
        debug!(
            "initialized '{}': {} variables on {} grids, dt={}",
            M::COMPONENT_NAME,
            variables.len(),
            grids.len(),
            model.time_step()
        );
        self.lifecycle = Lifecycle::Initialized(Box::new(Session {
            model,
            variables,
            grids,
            metrics: UpdateMetrics::default(),
        }));
        Ok(())
    }

    fn update(&mut self) -> Result<(), AdapterError> {
        self.timed_update(|ctl| ctl.advance_one_step())
    }

    fn update_frac(&mut self, time_frac: f64) -> Result<(), AdapterError> {
        self.timed_update(|ctl| ctl.advance_fraction(time_frac))
    }

    fn update_until(&mut self, time: f64) -> Result<(), AdapterError> {
        self.timed_update(|ctl| ctl.advance_until(time)).map(|_| ())
    }

    fn finalize(&mut self) -> Result<(), AdapterError> {
        self.session()?;
        self.lifecycle = Lifecycle::Finalized;
        debug!("finalized '{}'", M::COMPONENT_NAME);
        Ok(())
    }

    fn get_component_name(&self) -> &'static str {
        M::COMPONENT_NAME
    }

    fn get_input_var_names(&self) -> &'static [&'static str] {
        M::INPUT_VAR_NAMES
    }

    fn get_output_var_names(&self) -> &'static [&'static str] {
        M::OUTPUT_VAR_NAMES
    }

    fn get_var_type(&self, name: &str) -> Result<ElementType, AdapterError> {
        self.variables()?.variable_type(name)
    }

    fn get_var_units(&self, name: &str) -> Result<&str, AdapterError> {
        self.variables()?.variable_unit(name)
    }

    fn get_var_nbytes(&self, name: &str) -> Result<usize, AdapterError> {
        self.variables()?.variable_nbytes(name)
    }

    fn get_var_itemsize(&self, name: &str) -> Result<usize, AdapterError> {
        self.variables()?.variable_item_size(name)
    }

    fn get_var_location(&self, name: &str) -> Result<&'static str, AdapterError> {
        self.variables()?.variable_location(name)
    }

    fn get_var_grid(&self, name: &str) -> Result<GridId, AdapterError> {
        self.variables()?.variable_grid_id(name)
    }

    fn get_grid_rank(&self, grid: GridId) -> Result<usize, AdapterError> {
        Ok(self.grids()?.grid_rank(grid)?)
    }

    fn get_grid_size(&self, grid: GridId) -> Result<usize, AdapterError> {
        Ok(self.grids()?.grid_size(grid)?)
    }

    fn get_grid_shape(&self, grid: GridId) -> Result<&[usize], AdapterError> {
        Ok(self.grids()?.grid_shape(grid)?)
    }

    fn get_grid_spacing(&self, grid: GridId) -> Result<&[f64], AdapterError> {
        Ok(self.grids()?.grid_spacing(grid)?)
    }

    fn get_grid_origin(&self, grid: GridId) -> Result<&[f64], AdapterError> {
        Ok(self.grids()?.grid_origin(grid)?)
    }

    fn get_grid_type(&self, grid: GridId) -> Result<GridTopology, AdapterError> {
        Ok(self.grids()?.grid_topology(grid)?)
    }

    fn get_value(&self, name: &str) -> Result<Vec<f64>, AdapterError> {
        self.exchange()?.value_copy(name)
    }

    fn get_value_ref(&self, name: &str) -> Result<SharedBuffer, AdapterError> {
        self.exchange()?.value_ref(name)
    }

    fn set_value(&mut self, name: &str, values: &[f64]) -> Result<(), AdapterError> {
        self.exchange()?.set_value(name, values)
    }

    fn get_value_at_indices(
        &self,
        name: &str,
        indices: &[usize],
    ) -> Result<Vec<f64>, AdapterError> {
        self.exchange()?.value_at_indices(name, indices)
    }

    fn set_value_at_indices(
        &mut self,
        name: &str,
        indices: &[usize],
        values: &[f64],
    ) -> Result<(), AdapterError> {
        self.exchange()?.set_value_at_indices(name, indices, values)
    }

    fn get_start_time(&self) -> Result<f64, AdapterError> {
        self.session()?;
        Ok(START_TIME)
    }

    fn get_end_time(&self) -> Result<f64, AdapterError> {
        self.session()?;
        Ok(END_TIME)
    }

    fn get_current_time(&self) -> Result<f64, AdapterError> {
        Ok(self.session()?.model.time())
    }

    fn get_time_step(&self) -> Result<f64, AdapterError> {
        Ok(self.session()?.model.time_step())
    }

    fn get_time_units(&self) -> &'static str {
        TIME_UNITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::ModelError;
    use tether_test_utils::{RampConfig, RampModel, ELAPSED, LEVEL, RAMP_GRID, RATE};

    fn initialized() -> Adapter<RampModel> {
        let mut adapter = Adapter::new();
        adapter.initialize(RampConfig::default()).unwrap();
        adapter
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut adapter: Adapter<RampModel> = Adapter::new();
        assert_eq!(adapter.state(), LifecycleState::Uninitialized);

        adapter.initialize(RampConfig::default()).unwrap();
        assert_eq!(adapter.state(), LifecycleState::Initialized);
        assert_eq!(
            adapter.initialize(RampConfig::default()),
            Err(AdapterError::AlreadyInitialized {
                state: LifecycleState::Initialized
            })
        );

        adapter.finalize().unwrap();
        assert_eq!(adapter.state(), LifecycleState::Finalized);
        assert_eq!(
            adapter.finalize(),
            Err(AdapterError::Uninitialized {
                state: LifecycleState::Finalized
            })
        );
        assert_eq!(
            adapter.initialize(RampConfig::default()),
            Err(AdapterError::AlreadyInitialized {
                state: LifecycleState::Finalized
            })
        );
    }

    #[test]
    fn operations_need_initialize() {
        let mut adapter: Adapter<RampModel> = Adapter::new();
        let uninit = AdapterError::Uninitialized {
            state: LifecycleState::Uninitialized,
        };
        assert_eq!(adapter.update(), Err(uninit.clone()));
        assert_eq!(adapter.update_frac(0.5), Err(uninit.clone()));
        assert_eq!(adapter.update_until(1.0), Err(uninit.clone()));
        assert_eq!(adapter.finalize(), Err(uninit.clone()));
        assert_eq!(adapter.get_value(LEVEL), Err(uninit.clone()));
        assert_eq!(adapter.set_value(RATE, &[0.0; 20]), Err(uninit.clone()));
        assert_eq!(adapter.get_var_units(LEVEL), Err(uninit.clone()));
        assert_eq!(adapter.get_grid_rank(RAMP_GRID), Err(uninit.clone()));
        assert_eq!(adapter.get_current_time(), Err(uninit.clone()));
        assert_eq!(adapter.get_start_time(), Err(uninit));
        assert!(adapter.metrics().is_err());
    }

    #[test]
    fn metadata_answers_in_any_state() {
        let mut adapter: Adapter<RampModel> = Adapter::new();
        assert_eq!(adapter.get_component_name(), "Ramp model");
        assert_eq!(adapter.get_input_var_names(), &[RATE]);
        assert_eq!(adapter.get_output_var_names(), &[LEVEL, ELAPSED]);
        assert_eq!(adapter.get_time_units(), "-");

        adapter.initialize(RampConfig::default()).unwrap();
        adapter.finalize().unwrap();
        assert_eq!(adapter.get_component_name(), "Ramp model");
        assert_eq!(adapter.get_time_units(), "-");
    }

    #[test]
    fn time_queries() {
        let mut adapter = initialized();
        assert_eq!(adapter.get_start_time().unwrap(), 0.0);
        assert_eq!(adapter.get_end_time().unwrap(), f64::MAX);
        assert_eq!(adapter.get_time_step().unwrap(), 0.1);
        adapter.update().unwrap();
        assert!((adapter.get_current_time().unwrap() - 0.1).abs() < 1e-15);
    }

    #[test]
    fn failed_construction_stays_uninitialized() {
        let mut adapter: Adapter<RampModel> = Adapter::new();
        let err = adapter.initialize(RampConfig::new(&[4, 5], -1.0)).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::ModelConstruction(ModelError::InvalidConfig { .. })
        ));
        assert_eq!(adapter.state(), LifecycleState::Uninitialized);
        adapter.initialize(RampConfig::default()).unwrap();
    }

    #[test]
    fn metrics_track_updates() {
        let mut adapter = initialized();
        adapter.update().unwrap();
        adapter.update_frac(0.5).unwrap();
        adapter.update_until(0.45).unwrap();
        let m = adapter.metrics().unwrap();
        assert_eq!(m.whole_steps, 4);
        assert_eq!(m.fractional_steps, 1);
        assert_eq!(m.advance_calls, 5);
    }

    #[test]
    fn update_records_wall_time() {
        let mut adapter: Adapter<RampModel> = Adapter::new();
        adapter
            .initialize(RampConfig::new(&[1000, 1000], 0.1))
            .unwrap();
        assert_eq!(adapter.metrics().unwrap().last_update_us, 0);
        adapter.update().unwrap();
        assert!(adapter.metrics().unwrap().last_update_us > 0);
    }

    #[test]
    fn repeated_until_target_is_a_no_op() {
        let mut adapter = initialized();
        adapter.update_until(0.3).unwrap();
        adapter.update_until(0.3).unwrap();
        assert_eq!(adapter.metrics().unwrap().advance_calls, 3);
        assert_eq!(adapter.model().unwrap().advance_calls(), 3);
    }

    #[test]
    fn plan_until_does_not_advance() {
        let mut adapter = initialized();
        let plan = adapter.plan_until(0.35).unwrap();
        assert_eq!(plan.whole_steps, 3);
        assert!((plan.remainder - 0.5).abs() < 1e-9);
        assert_eq!(adapter.get_current_time().unwrap(), 0.0);
    }

    #[test]
    fn custom_epsilon_validated() {
        let bad = AdapterConfig { time_epsilon: 0.9 };
        assert!(Adapter::<RampModel>::with_config(bad).is_err());
        let good = AdapterConfig { time_epsilon: 1e-6 };
        let adapter = Adapter::<RampModel>::with_config(good).unwrap();
        assert_eq!(adapter.config().time_epsilon, 1e-6);
    }

    #[test]
    fn debug_names_component_and_state() {
        let adapter = initialized();
        let text = format!("{adapter:?}");
        assert!(text.contains("Ramp model"));
        assert!(text.contains("Initialized"));
    }
}
