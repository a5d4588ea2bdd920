//! Error types for grid construction, integration configuration and output
//!
//! Only precondition violations are errors. A streamline leaving the domain,
//! stalling or hitting its step bound is a normal outcome and is reported as a
//! [`TerminationReason`](crate::integrator::TerminationReason) instead.

use crate::core_types::Vec3;

/// Grid axis, used to point at the offending component in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis (index `i`)
    X,
    /// Y axis (index `j`)
    Y,
    /// Z axis (index `k`)
    Z,
}

impl Axis {
    /// All three axes in index order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// A vector grid that violates its structural invariants
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A dimension is zero
    ZeroDimension {
        /// Offending axis
        axis: Axis,
    },
    /// A spacing component is not finite and strictly positive
    InvalidSpacing {
        /// Offending axis
        axis: Axis,
        /// Rejected value
        value: f64,
    },
    /// An origin component is not finite
    InvalidOrigin {
        /// Offending axis
        axis: Axis,
        /// Rejected value
        value: f64,
    },
    /// The sample buffer does not hold exactly one vector per grid node
    SampleCountMismatch {
        /// `nx * ny * nz`
        expected: usize,
        /// Samples actually supplied
        actual: usize,
    },
    /// A sample has a NaN or infinite component
    NonFiniteSample {
        /// Flat index of the sample
        index: usize,
        /// Rejected vector
        value: Vec3,
    },
    /// `nx * ny * nz` does not fit in `usize`
    DimensionOverflow,
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::ZeroDimension { axis } => {
                write!(f, "Grid dimension along {axis} must be positive")
            }
            GridError::InvalidSpacing { axis, value } => write!(
                f,
                "Grid spacing along {axis} must be finite and positive, got {value}"
            ),
            GridError::InvalidOrigin { axis, value } => {
                write!(f, "Grid origin along {axis} must be finite, got {value}")
            }
            GridError::SampleCountMismatch { expected, actual } => write!(
                f,
                "Grid expects {expected} vector samples, got {actual}"
            ),
            GridError::NonFiniteSample { index, value } => write!(
                f,
                "Grid sample {index} must be finite, got ({}, {}, {})",
                value.x, value.y, value.z
            ),
            GridError::DimensionOverflow => write!(f, "Grid node count overflows usize"),
        }
    }
}

impl std::error::Error for GridError {}

/// An integration configuration that cannot drive a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Step length is not finite and strictly positive
    InvalidStepLength(f64),
    /// Maximum step count is zero
    ZeroMaxSteps,
    /// Stall epsilon is negative or not finite
    InvalidStallEpsilon(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidStepLength(h) => {
                write!(f, "Step length must be finite and positive, got {h}")
            }
            ConfigError::ZeroMaxSteps => write!(f, "Maximum step count must be positive"),
            ConfigError::InvalidStallEpsilon(eps) => write!(
                f,
                "Stall epsilon must be finite and non-negative, got {eps}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Precondition violation reported before any tracing starts
#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    /// The grid is malformed
    Grid(GridError),
    /// The integration configuration is invalid
    Config(ConfigError),
    /// The seed has a non-finite component
    InvalidSeed(Vec3),
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::Grid(e) => write!(f, "Invalid grid: {e}"),
            TraceError::Config(e) => write!(f, "Invalid integration config: {e}"),
            TraceError::InvalidSeed(p) => write!(
                f,
                "Seed point must be finite, got ({}, {}, {})",
                p.x, p.y, p.z
            ),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Grid(e) => Some(e),
            TraceError::Config(e) => Some(e),
            TraceError::InvalidSeed(_) => None,
        }
    }
}

impl From<GridError> for TraceError {
    fn from(error: GridError) -> Self {
        TraceError::Grid(error)
    }
}

impl From<ConfigError> for TraceError {
    fn from(error: ConfigError) -> Self {
        TraceError::Config(error)
    }
}

/// Failure while serializing a streamline
#[derive(Debug)]
pub enum OutputError {
    /// Underlying writer or file failed
    Io(std::io::Error),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "Failed to write streamline: {e}"),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for OutputError {
    fn from(error: std::io::Error) -> Self {
        OutputError::Io(error)
    }
}
