//! Classical 4th-order Runge-Kutta step through a sampled field
//!
//! Integrates `dP/dt = d · F(P)` for one fixed step `h`, where `d = ±1` is the
//! temporal direction:
//!
//! ```text
//! k1 = d · F(p)
//! k2 = d · F(p + h/2 · k1)
//! k3 = d · F(p + h/2 · k2)
//! k4 = d · F(p + h · k3)
//! p' = p + h/6 · (k1 + 2·k2 + 2·k3 + k4)
//! ```
//!
//! The sign is applied to each stage vector, never to `h`.

use crate::core_types::Vec3;
use crate::grid::{FieldSampler, OutOfBounds};
use serde::{Deserialize, Serialize};

/// Temporal direction of integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow the field
    Forward,
    /// Against the field
    Backward,
}

impl Direction {
    /// Sign multiplier applied to each stage vector
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// The other direction
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Why a single step could not produce a new position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepError {
    /// One of the four stage samples fell outside the domain
    OutOfBounds,
    /// `|F(p)|` is below the stall threshold
    Stalled,
}

impl From<OutOfBounds> for StepError {
    fn from(_: OutOfBounds) -> Self {
        StepError::OutOfBounds
    }
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepError::OutOfBounds => write!(f, "Step left the sampled domain"),
            StepError::Stalled => write!(f, "Field magnitude below stall threshold"),
        }
    }
}

impl std::error::Error for StepError {}

/// Advance `position` by one RK4 step of length `h`
///
/// Pure: nothing is retained between calls. An out-of-bounds sample at any
/// stage aborts the whole step. The stall check runs on `k1`, before any
/// further stage is evaluated; `stall_epsilon == 0.0` never stalls.
///
/// # Errors
///
/// - [`StepError::OutOfBounds`] if any stage sample lies outside the domain,
///   or the resulting position is not finite
/// - [`StepError::Stalled`] if `|k1| < stall_epsilon`
pub fn rk4_step<S>(
    sampler: &S,
    position: &Vec3,
    direction: Direction,
    h: f64,
    stall_epsilon: f64,
) -> Result<Vec3, StepError>
where
    S: FieldSampler + ?Sized,
{
    let sign = direction.sign();

    let k1 = sampler.sample_at(position)? * sign;
    if k1.norm() < stall_epsilon {
        return Err(StepError::Stalled);
    }

    let k2 = sampler.sample_at(&(position + k1 * (h * 0.5)))? * sign;
    let k3 = sampler.sample_at(&(position + k2 * (h * 0.5)))? * sign;
    let k4 = sampler.sample_at(&(position + k3 * h))? * sign;

    let next = position + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0);
    if next.iter().all(|c| c.is_finite()) {
        Ok(next)
    } else {
        Err(StepError::OutOfBounds)
    }
}
