//! Integration parameters passed explicitly into the tracer

use crate::error::ConfigError;
use crate::grid::VectorGrid;
use serde::{Deserialize, Serialize};

/// Default integration constants
pub mod constants {
    /// Step length used when none is given (world units per unit time)
    pub const DEFAULT_STEP_LENGTH: f64 = 0.05;

    /// Maximum steps per direction when none is given
    pub const DEFAULT_MAX_STEPS: usize = 1000;

    /// Field magnitude below which integration is considered stalled
    pub const DEFAULT_STALL_EPSILON: f64 = 1e-9;

    /// Fraction of the smallest grid spacing used by [`super::IntegrationConfig::for_grid`]
    pub const GRID_STEP_FRACTION: f64 = 0.25;
}

/// Configuration for one streamline trace
///
/// `step_length` is the fixed RK4 step `h`; its magnitude is the same in both
/// directions. `max_steps` bounds each direction independently and is the only
/// termination guarantee in closed or oscillating flows. `stall_epsilon` is
/// the field magnitude below which a direction stops as stalled; `0.0`
/// disables stall detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Fixed RK4 step length `h` (> 0)
    pub step_length: f64,

    /// Maximum steps per direction (> 0)
    pub max_steps: usize,

    /// Stall threshold on `|F(p)|` (>= 0, 0 disables)
    pub stall_epsilon: f64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            step_length: constants::DEFAULT_STEP_LENGTH,
            max_steps: constants::DEFAULT_MAX_STEPS,
            stall_epsilon: constants::DEFAULT_STALL_EPSILON,
        }
    }
}

impl IntegrationConfig {
    /// Create a configuration
    #[must_use]
    pub fn new(step_length: f64, max_steps: usize, stall_epsilon: f64) -> Self {
        Self {
            step_length,
            max_steps,
            stall_epsilon,
        }
    }

    /// Defaults with the step length scaled to the grid resolution
    ///
    /// Uses a quarter of the smallest node spacing, so each RK4 stage moves
    /// well under one cell per unit field magnitude.
    #[must_use]
    pub fn for_grid(grid: &VectorGrid) -> Self {
        Self {
            step_length: grid.min_spacing() * constants::GRID_STEP_FRACTION,
            ..Self::default()
        }
    }

    /// Replace the step length
    pub fn with_step_length(mut self, step_length: f64) -> Self {
        self.step_length = step_length;
        self
    }

    /// Replace the maximum step count
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Replace the stall threshold
    pub fn with_stall_epsilon(mut self, stall_epsilon: f64) -> Self {
        self.stall_epsilon = stall_epsilon;
        self
    }

    /// Check that the configuration can drive a trace
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive or non-finite step length, a
    /// zero step bound, or a negative or non-finite stall epsilon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step_length.is_finite() || self.step_length <= 0.0 {
            return Err(ConfigError::InvalidStepLength(self.step_length));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if !self.stall_epsilon.is_finite() || self.stall_epsilon < 0.0 {
            return Err(ConfigError::InvalidStallEpsilon(self.stall_epsilon));
        }
        Ok(())
    }
}
