//! Reusable model fixtures.
//!
//! [`RampModel`] integrates `level += rate * dt` on every cell of a
//! rectilinear grid and mirrors elapsed time into a scalar variable. Every
//! advance is recorded, so tests can assert exactly how many solver steps
//! ran and with which step sizes.

use std::cell::RefCell;
use std::rc::Rc;

use tether_core::{GridId, ModelError, SharedBuffer, VariableSpec};
use tether_grid::GridDescriptor;
use tether_model::{CoupledModel, NumericalModel};

/// Per-cell rate (input).
pub const RATE: &str = "ramp__rate";
/// Per-cell integrated level (output).
pub const LEVEL: &str = "ramp__level";
/// Elapsed model time (output, scalar grid).
pub const ELAPSED: &str = "ramp__elapsed_time";

pub const RAMP_GRID: GridId = GridId(0);
pub const CLOCK_GRID: GridId = GridId(1);

/// Configuration for [`RampModel`].
#[derive(Clone, Debug)]
pub struct RampConfig {
    pub shape: Vec<usize>,
    pub time_step: f64,
    /// Initial rate for every cell. Cell `i` starts at `rate * (i + 1)`.
    pub rate: f64,
    /// Fail every advance after this many successful ones.
    pub fail_after: Option<usize>,
    /// Shared log of the `dt` used by every successful advance.
    pub step_log: Rc<RefCell<Vec<f64>>>,
}

impl RampConfig {
    pub fn new(shape: &[usize], time_step: f64) -> Self {
        Self {
            shape: shape.to_vec(),
            time_step,
            rate: 1.0,
            fail_after: None,
            step_log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

impl Default for RampConfig {
    fn default() -> Self {
        Self::new(&[4, 5], 0.1)
    }
}

/// Deterministic linear model.
#[derive(Debug)]
pub struct RampModel {
    grid: GridDescriptor,
    time: f64,
    dt: f64,
    rate: SharedBuffer,
    level: SharedBuffer,
    elapsed: SharedBuffer,
    fail_after: Option<usize>,
    advance_calls: usize,
    step_log: Rc<RefCell<Vec<f64>>>,
}

impl RampModel {
    pub fn new(config: RampConfig) -> Result<Self, ModelError> {
        if !config.time_step.is_finite() || config.time_step <= 0.0 {
            return Err(ModelError::InvalidConfig {
                reason: format!("time_step must be positive, got {}", config.time_step),
            });
        }
        let rank = config.shape.len();
        let grid = GridDescriptor::uniform_rectilinear(
            RAMP_GRID,
            &config.shape,
            &vec![1.0; rank],
            &vec![0.0; rank],
        )
        .map_err(|e| ModelError::InvalidConfig {
            reason: e.to_string(),
        })?;
        let n = grid.size();
        let rate = (0..n).map(|i| config.rate * (i + 1) as f64).collect();
        Ok(Self {
            time: 0.0,
            dt: config.time_step,
            rate: SharedBuffer::new(rate),
            level: SharedBuffer::zeros(n),
            elapsed: SharedBuffer::zeros(1),
            fail_after: config.fail_after,
            advance_calls: 0,
            step_log: config.step_log,
            grid,
        })
    }

    /// Number of successful advances so far.
    pub fn advance_calls(&self) -> usize {
        self.advance_calls
    }

    /// The `dt` of every successful advance, in order.
    pub fn step_log(&self) -> Vec<f64> {
        self.step_log.borrow().clone()
    }

    pub fn level(&self) -> &SharedBuffer {
        &self.level
    }

    pub fn rate(&self) -> &SharedBuffer {
        &self.rate
    }
}

impl NumericalModel for RampModel {
    fn advance(&mut self) -> Result<(), ModelError> {
        if let Some(limit) = self.fail_after {
            if self.advance_calls >= limit {
                return Err(ModelError::ExecutionFailed {
                    reason: format!("ramp model configured to fail after {limit} steps"),
                });
            }
        }
        {
            let rate = self.rate.read();
            let mut level = self.level.write();
            for (l, r) in level.iter_mut().zip(rate.iter()) {
                *l += r * self.dt;
            }
        }
        self.time += self.dt;
        self.elapsed.write()[0] = self.time;
        self.advance_calls += 1;
        self.step_log.borrow_mut().push(self.dt);
        Ok(())
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn time_step(&self) -> f64 {
        self.dt
    }

    fn set_time_step(&mut self, dt: f64) {
        self.dt = dt;
    }

    fn variable(&self, name: &str) -> Option<VariableSpec> {
        match name {
            RATE => Some(VariableSpec::float64("m s-1", RAMP_GRID, self.rate.clone())),
            LEVEL => Some(VariableSpec::float64("m", RAMP_GRID, self.level.clone())),
            ELAPSED => Some(VariableSpec::float64("s", CLOCK_GRID, self.elapsed.clone())),
            _ => None,
        }
    }

    fn grid(&self, grid: GridId) -> Option<GridDescriptor> {
        match grid {
            RAMP_GRID => Some(self.grid.clone()),
            CLOCK_GRID => Some(GridDescriptor::scalar(CLOCK_GRID)),
            _ => None,
        }
    }
}

impl CoupledModel for RampModel {
    type Config = RampConfig;

    const COMPONENT_NAME: &'static str = "Ramp model";
    const INPUT_VAR_NAMES: &'static [&'static str] = &[RATE];
    const OUTPUT_VAR_NAMES: &'static [&'static str] = &[LEVEL, ELAPSED];

    fn build(config: Self::Config) -> Result<Self, ModelError> {
        Self::new(config)
    }
}
