//! Vector type alias for 3D positions, field samples and velocities.

use nalgebra::Vector3;

/// 3D vector type for world positions and field vectors.
///
/// This is a simple alias for `nalgebra::Vector3<f64>`, used throughout
/// the tracer for seed points, grid origins, spacings, interpolated field
/// samples and RK4 stage vectors. Double precision keeps long integrations
/// reproducible.
pub type Vec3 = Vector3<f64>;
