//! Bidirectional streamline tracing from a seed point
//!
//! Each direction runs its own small state machine:
//!
//! ```text
//! Running ──step ok──▶ Running
//!    │
//!    ├── OutOfBounds ──▶ Terminated(OutOfBounds)
//!    ├── Stalled ──────▶ Terminated(Stalled)
//!    └── steps == max ─▶ Terminated(MaxStepsReached)
//! ```
//!
//! The two directions are independent and never need to stop for the same
//! reason or after the same number of steps. Termination is absorbed here and
//! reported on the [`Streamline`]; only precondition violations are errors.

use super::config::IntegrationConfig;
use super::rk4::{rk4_step, Direction, StepError};
use crate::core_types::Vec3;
use crate::error::TraceError;
use crate::grid::{FieldSampler, VectorGrid};
use crate::streamline::Streamline;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Why one direction of a trace stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The next step would leave the sampled domain
    OutOfBounds,
    /// The local field magnitude fell below the stall threshold
    Stalled,
    /// The per-direction step bound was hit
    MaxStepsReached,
}

impl From<StepError> for TerminationReason {
    fn from(error: StepError) -> Self {
        match error {
            StepError::OutOfBounds => TerminationReason::OutOfBounds,
            StepError::Stalled => TerminationReason::Stalled,
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OutOfBounds => write!(f, "left domain"),
            TerminationReason::Stalled => write!(f, "stalled"),
            TerminationReason::MaxStepsReached => write!(f, "max steps reached"),
        }
    }
}

/// Outcome of one direction of a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionSummary {
    /// Successful integration steps (points contributed besides the seed)
    pub steps: usize,
    /// Why the direction stopped
    pub reason: TerminationReason,
}

/// Transient state for one direction, discarded when it terminates
#[derive(Debug, Clone, Copy)]
struct IntegrationState {
    position: Vec3,
    steps: usize,
}

impl IntegrationState {
    fn new(seed: Vec3) -> Self {
        Self {
            position: seed,
            steps: 0,
        }
    }

    fn advance(&mut self, next: Vec3) {
        self.position = next;
        self.steps += 1;
    }
}

/// Drives RK4 stepping through a borrowed field in both directions
///
/// The tracer only reads the sampler, so one tracer (or many tracers sharing
/// one grid) can be used from several threads at once.
#[derive(Debug)]
pub struct StreamlineTracer<'a, S: FieldSampler + ?Sized = VectorGrid> {
    sampler: &'a S,
    config: IntegrationConfig,
}

impl<'a> StreamlineTracer<'a, VectorGrid> {
    /// Create a tracer over a grid
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] if the grid is malformed or the configuration is
    /// invalid. Nothing is traced in that case.
    pub fn new(grid: &'a VectorGrid, config: IntegrationConfig) -> Result<Self, TraceError> {
        grid.validate()?;
        Self::with_sampler(grid, config)
    }
}

impl<'a, S: FieldSampler + ?Sized> StreamlineTracer<'a, S> {
    /// Create a tracer over any field sampler
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Config`] if the configuration is invalid.
    pub fn with_sampler(sampler: &'a S, config: IntegrationConfig) -> Result<Self, TraceError> {
        config.validate()?;
        Ok(Self { sampler, config })
    }

    /// Configuration this tracer runs with
    #[must_use]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Trace a streamline through `seed` in both directions
    ///
    /// The result is the backward points in reverse order, the seed, then the
    /// forward points. If neither direction takes a step the streamline is the
    /// seed alone, which is a valid result.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidSeed`] if `seed` has a non-finite
    /// component. Leaving the domain, stalling and hitting the step bound are
    /// not errors.
    pub fn trace(&self, seed: &Vec3) -> Result<Streamline, TraceError> {
        if !seed.iter().all(|c| c.is_finite()) {
            return Err(TraceError::InvalidSeed(*seed));
        }

        let (backward_points, backward) = self.trace_direction(seed, Direction::Backward);
        let (forward_points, forward) = self.trace_direction(seed, Direction::Forward);

        let streamline =
            Streamline::assemble(*seed, backward_points, forward_points, backward, forward);

        info!(
            "Traced streamline from ({:.4}, {:.4}, {:.4}): {} points, backward {} steps ({}), forward {} steps ({})",
            seed.x,
            seed.y,
            seed.z,
            streamline.len(),
            backward.steps,
            backward.reason,
            forward.steps,
            forward.reason
        );

        Ok(streamline)
    }

    /// Integrate from `seed` in one direction until it terminates
    ///
    /// Returns the new positions in chronological order (the seed itself is
    /// not included) and the direction's summary. `seed` must already be
    /// finite.
    pub(crate) fn trace_direction(
        &self,
        seed: &Vec3,
        direction: Direction,
    ) -> (Vec<Vec3>, DirectionSummary) {
        let mut state = IntegrationState::new(*seed);
        let mut points = Vec::new();

        let reason = loop {
            if state.steps >= self.config.max_steps {
                break TerminationReason::MaxStepsReached;
            }
            match rk4_step(
                self.sampler,
                &state.position,
                direction,
                self.config.step_length,
                self.config.stall_epsilon,
            ) {
                Ok(next) => {
                    points.push(next);
                    state.advance(next);
                }
                Err(error) => break error.into(),
            }
        };

        debug!(
            "{} integration stopped after {} steps: {}",
            direction, state.steps, reason
        );

        (
            points,
            DirectionSummary {
                steps: state.steps,
                reason,
            },
        )
    }
}

/// Trace one streamline through a grid with the given configuration
///
/// # Errors
///
/// Returns [`TraceError`] on a malformed grid, invalid configuration or
/// non-finite seed.
pub fn trace_streamline(
    grid: &VectorGrid,
    seed: &Vec3,
    config: IntegrationConfig,
) -> Result<Streamline, TraceError> {
    StreamlineTracer::new(grid, config)?.trace(seed)
}
