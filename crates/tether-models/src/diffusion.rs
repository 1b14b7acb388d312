//! Explicit 2-D heat diffusion on a rectangular plate.
//!
//! Each advance applies the five-point stencil
//!
//! ```text
//! T'[r,c] = T[r,c] + alpha * dt * ( (T[r-1,c] + T[r+1,c] - 2 T[r,c]) / dy^2
//!                                 + (T[r,c-1] + T[r,c+1] - 2 T[r,c]) / dx^2 )
//! ```
//!
//! to interior cells. Edge cells keep their temperature. All reads come
//! from the state at the start of the step (Jacobi update).

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tether_core::{GridId, ModelError, SharedBuffer, VariableSpec};
use tether_grid::GridDescriptor;
use tether_model::{CoupledModel, NumericalModel};

/// Name of the plate temperature variable.
pub const TEMPERATURE: &str = "plate_surface__temperature";

/// Grid the plate temperature lives on.
pub const PLATE_GRID: GridId = GridId(0);

/// Configuration for [`Diffusion`].
///
/// `shape`, `spacing` and `origin` are `(rows, cols)` ordered: axis 0 runs
/// along `y`, axis 1 along `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffusionConfig {
    /// Nodes per axis. Each axis needs at least 3 nodes so the plate has
    /// an interior.
    pub shape: [usize; 2],
    /// Node spacing per axis.
    pub spacing: [f64; 2],
    /// Coordinates of node `(0, 0)`.
    pub origin: [f64; 2],
    /// Thermal diffusivity.
    pub alpha: f64,
    /// Seed for the random initial temperature field.
    pub seed: u64,
    /// Native step. `None` picks the stability limit
    /// `min(spacing)^2 / (4 * alpha)`.
    pub time_step: Option<f64>,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            shape: [10, 20],
            spacing: [1.0, 1.0],
            origin: [0.0, 0.0],
            alpha: 1.0,
            seed: 0,
            time_step: None,
        }
    }
}

impl DiffusionConfig {
    /// Check every setting, returning the first violation.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (axis, &n) in self.shape.iter().enumerate() {
            if n < 3 {
                return Err(invalid(format!(
                    "shape[{axis}] must be at least 3, got {n}"
                )));
            }
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(invalid(format!(
                "alpha must be finite and positive, got {}",
                self.alpha
            )));
        }
        if let Some(dt) = self.time_step {
            if !dt.is_finite() || dt <= 0.0 {
                return Err(invalid(format!(
                    "time_step must be finite and positive, got {dt}"
                )));
            }
        }
        // Spacing and origin are checked by the grid constructor.
        self.grid().map(|_| ())
    }

    /// The step the model starts with.
    pub fn resolved_time_step(&self) -> f64 {
        self.time_step.unwrap_or_else(|| {
            let h = self.spacing[0].min(self.spacing[1]);
            h * h / (4.0 * self.alpha)
        })
    }

    fn grid(&self) -> Result<GridDescriptor, ModelError> {
        GridDescriptor::uniform_rectilinear(PLATE_GRID, &self.shape, &self.spacing, &self.origin)
            .map_err(|e| invalid(e.to_string()))
    }
}

/// Builder for [`DiffusionConfig`].
///
/// Starts from [`DiffusionConfig::default()`]; [`build()`](Self::build)
/// validates the result.
#[derive(Clone, Debug)]
pub struct DiffusionBuilder {
    config: DiffusionConfig,
}

impl DiffusionConfig {
    /// Create a builder seeded with the default plate.
    pub fn builder() -> DiffusionBuilder {
        DiffusionBuilder {
            config: Self::default(),
        }
    }
}

impl DiffusionBuilder {
    /// Nodes along `y` (rows) and `x` (columns).
    pub fn shape(mut self, rows: usize, cols: usize) -> Self {
        self.config.shape = [rows, cols];
        self
    }

    /// Node spacing along `y` and `x`.
    pub fn spacing(mut self, dy: f64, dx: f64) -> Self {
        self.config.spacing = [dy, dx];
        self
    }

    /// Coordinates of node `(0, 0)`.
    pub fn origin(mut self, y: f64, x: f64) -> Self {
        self.config.origin = [y, x];
        self
    }

    /// Thermal diffusivity (default 1.0). Must be finite and > 0.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Seed for the initial temperature field (default 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Override the native step instead of using the stability limit.
    pub fn time_step(mut self, dt: f64) -> Self {
        self.config.time_step = Some(dt);
        self
    }

    /// Validate and return the config.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if:
    /// - either shape entry is below 3
    /// - a spacing is not finite and > 0, or an origin is not finite
    /// - `alpha` is not finite and > 0
    /// - an explicit `time_step` is not finite and > 0
    pub fn build(self) -> Result<DiffusionConfig, ModelError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn invalid(reason: String) -> ModelError {
    ModelError::InvalidConfig { reason }
}

/// Plate heat diffusion model.
#[derive(Debug)]
pub struct Diffusion {
    grid: GridDescriptor,
    alpha: f64,
    time: f64,
    dt: f64,
    temperature: SharedBuffer,
    next: Vec<f64>,
}

impl Diffusion {
    /// Build a model with a seeded random temperature field in `[0, 1)`.
    pub fn new(config: DiffusionConfig) -> Result<Self, ModelError> {
        config.validate()?;
        let grid = config.grid()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let initial: Vec<f64> = (0..grid.size()).map(|_| rng.random::<f64>()).collect();
        log::debug!(
            "diffusion: {}x{} plate, alpha={}, dt={}",
            config.shape[0],
            config.shape[1],
            config.alpha,
            config.resolved_time_step(),
        );
        Ok(Self {
            next: vec![0.0; grid.size()],
            temperature: SharedBuffer::new(initial),
            alpha: config.alpha,
            time: 0.0,
            dt: config.resolved_time_step(),
            grid,
        })
    }

    /// Live temperature buffer.
    pub fn temperature(&self) -> &SharedBuffer {
        &self.temperature
    }

    /// Temperature at node `(row, col)`.
    pub fn temperature_at(&self, row: usize, col: usize) -> Option<f64> {
        let i = self.grid.flat_index(&[row, col])?;
        self.temperature.get(i)
    }

    /// The plate grid.
    pub fn plate(&self) -> &GridDescriptor {
        &self.grid
    }

    /// Thermal diffusivity.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl NumericalModel for Diffusion {
    fn advance(&mut self) -> Result<(), ModelError> {
        let rows = self.grid.shape()[0];
        let cols = self.grid.shape()[1];
        let dy = self.grid.spacing()[0];
        let dx = self.grid.spacing()[1];
        let cy = self.alpha * self.dt / (dy * dy);
        let cx = self.alpha * self.dt / (dx * dx);

        {
            let t = self.temperature.read();
            self.next.copy_from_slice(&t);
            for r in 1..rows - 1 {
                for c in 1..cols - 1 {
                    let i = r * cols + c;
                    let centre = 2.0 * t[i];
                    self.next[i] = t[i]
                        + cy * (t[i - cols] + t[i + cols] - centre)
                        + cx * (t[i - 1] + t[i + 1] - centre);
                }
            }
        }

        // Reject the step before publishing it; state stays at the last good step.
        if let Some(idx) = self.next.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NanDetected {
                variable: TEMPERATURE.to_string(),
                cell_index: Some(idx),
            });
        }

        self.temperature.copy_from_slice(&self.next);
        self.time += self.dt;
        log::trace!("diffusion: advanced to t={}", self.time);
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
        (name == TEMPERATURE)
            .then(|| VariableSpec::float64("C", PLATE_GRID, self.temperature.clone()))
    }

    fn grid(&self, grid: GridId) -> Option<GridDescriptor> {
        (grid == PLATE_GRID).then(|| self.grid.clone())
    }
}

impl CoupledModel for Diffusion {
    type Config = DiffusionConfig;

    const COMPONENT_NAME: &'static str = "Diffusion model";
    const INPUT_VAR_NAMES: &'static [&'static str] = &[TEMPERATURE];
    const OUTPUT_VAR_NAMES: &'static [&'static str] = &[TEMPERATURE];

    fn build(config: Self::Config) -> Result<Self, ModelError> {
        Self::new(config)
    }
}
