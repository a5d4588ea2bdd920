//! C-compatible value types shared by the grid and trace entry points.
//!
//! All types are `#[repr(C)]` and `Copy`, so they can be passed by value from
//! C/C++/C# without any allocation on either side.

use streamline_core::{GridDimensions, IntegrationConfig, TerminationReason, Vec3};

/// 3D vector or point in world coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamlineVec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl From<StreamlineVec3> for Vec3 {
    fn from(v: StreamlineVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for StreamlineVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Number of grid nodes along each axis.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamlineDimensions {
    /// Samples along X.
    pub nx: usize,
    /// Samples along Y.
    pub ny: usize,
    /// Samples along Z.
    pub nz: usize,
}

impl From<StreamlineDimensions> for GridDimensions {
    fn from(d: StreamlineDimensions) -> Self {
        GridDimensions::new(d.nx, d.ny, d.nz)
    }
}

impl From<GridDimensions> for StreamlineDimensions {
    fn from(d: GridDimensions) -> Self {
        Self {
            nx: d.nx,
            ny: d.ny,
            nz: d.nz,
        }
    }
}

/// Integration parameters for one trace.
///
/// Obtain sensible values with `streamline_config_default` and override
/// individual fields as needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamlineConfig {
    /// Fixed RK4 step length (> 0).
    pub step_length: f64,
    /// Maximum steps per direction (> 0).
    pub max_steps: usize,
    /// Field magnitude below which a direction stalls (>= 0, 0 disables).
    pub stall_epsilon: f64,
}

impl From<StreamlineConfig> for IntegrationConfig {
    fn from(c: StreamlineConfig) -> Self {
        IntegrationConfig::new(c.step_length, c.max_steps, c.stall_epsilon)
    }
}

impl From<IntegrationConfig> for StreamlineConfig {
    fn from(c: IntegrationConfig) -> Self {
        Self {
            step_length: c.step_length,
            max_steps: c.max_steps,
            stall_epsilon: c.stall_epsilon,
        }
    }
}

/// Integration direction of one half of a streamline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamlineDirection {
    /// Against the field.
    Backward = 0,
    /// Along the field.
    Forward = 1,
}

/// Why one direction of a trace stopped.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamlineTermination {
    /// The next step would have left the grid.
    OutOfBounds = 0,
    /// The field magnitude fell below the stall threshold.
    Stalled = 1,
    /// The per-direction step bound was reached.
    MaxStepsReached = 2,
}

impl From<TerminationReason> for StreamlineTermination {
    fn from(reason: TerminationReason) -> Self {
        match reason {
            TerminationReason::OutOfBounds => StreamlineTermination::OutOfBounds,
            TerminationReason::Stalled => StreamlineTermination::Stalled,
            TerminationReason::MaxStepsReached => StreamlineTermination::MaxStepsReached,
        }
    }
}
