//! Analytic vector fields sampled onto a [`VectorGrid`]
//!
//! Dataset readers live outside this crate. These builders give the tracer
//! something realistic to integrate through in tests and demos:
//!
//! - **Uniform**: the same vector everywhere. RK4 is exact for it.
//! - **Rotation**: solid-body rotation about the vertical axis through the
//!   domain centre. Streamlines are closed circles, so traces only end by
//!   step count.
//! - **Tornado**: a Rankine-style vortex about the vertical axis with radial
//!   inflow and an updraft that weakens with height, giving rising helical
//!   streamlines similar to the classic tornado test dataset.

use super::{GridDimensions, VectorGrid};
use crate::core_types::Vec3;
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Analytic field definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SyntheticField {
    /// Constant vector
    Uniform {
        /// Field value at every node
        velocity: Vec3,
    },
    /// `v = ω ẑ × (p - c)`
    Rotation {
        /// Angular speed ω (rad per unit time)
        angular_speed: f64,
    },
    /// Swirling updraft about the vertical axis through the domain centre
    Tornado {
        /// Peak tangential speed, reached at the core radius
        swirl: f64,
        /// Core radius of the vortex (world units)
        core_radius: f64,
        /// Radial inflow speed per unit distance from the axis
        inflow: f64,
        /// Vertical speed at the bottom of the domain
        updraft: f64,
    },
}

impl SyntheticField {
    /// Tornado with parameters tuned for a unit-ish domain
    #[must_use]
    pub fn tornado() -> Self {
        SyntheticField::Tornado {
            swirl: 1.0,
            core_radius: 0.15,
            inflow: 0.2,
            updraft: 0.5,
        }
    }

    /// Evaluate the field at `p`
    ///
    /// `center` is the axis position for rotational fields and `height` the
    /// vertical extent of the domain used to attenuate the tornado updraft.
    #[must_use]
    pub fn velocity_at(&self, p: Vec3, center: Vec3, height: f64) -> Vec3 {
        match *self {
            SyntheticField::Uniform { velocity } => velocity,
            SyntheticField::Rotation { angular_speed } => {
                let d = p - center;
                Vec3::new(-angular_speed * d.y, angular_speed * d.x, 0.0)
            }
            SyntheticField::Tornado {
                swirl,
                core_radius,
                inflow,
                updraft,
            } => {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                let r = dx.hypot(dy);

                // Rankine profile: solid-body inside the core, 1/r outside
                let tangential = if r <= core_radius {
                    swirl * r / core_radius
                } else {
                    swirl * core_radius / r
                };
                let (tx, ty) = if r > 0.0 {
                    (-dy / r, dx / r)
                } else {
                    (0.0, 0.0)
                };

                // Updraft decays linearly from the floor to the lid
                let bottom = center.z - 0.5 * height;
                let rise = if height > 0.0 {
                    ((p.z - bottom) / height).clamp(0.0, 1.0)
                } else {
                    0.0
                };

                Vec3::new(
                    tangential * tx - inflow * dx,
                    tangential * ty - inflow * dy,
                    updraft * (1.0 - 0.5 * rise),
                )
            }
        }
    }

    /// Sample the field onto a grid
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the dimensions, origin or spacing are invalid.
    pub fn build(
        &self,
        dimensions: GridDimensions,
        origin: Vec3,
        spacing: Vec3,
    ) -> Result<VectorGrid, GridError> {
        let extent = Vec3::new(
            spacing.x * dimensions.nx.saturating_sub(1) as f64,
            spacing.y * dimensions.ny.saturating_sub(1) as f64,
            spacing.z * dimensions.nz.saturating_sub(1) as f64,
        );
        let center = origin + extent * 0.5;
        let field = *self;
        VectorGrid::from_fn(dimensions, origin, spacing, |p| {
            field.velocity_at(p, center, extent.z)
        })
    }

    /// Sample the field onto `[0, 1]³` with `resolution` nodes per axis
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if `resolution < 2`.
    pub fn build_unit_cube(&self, resolution: usize) -> Result<VectorGrid, GridError> {
        // A single node per axis gives infinite spacing, which validation rejects
        let h = 1.0 / resolution.saturating_sub(1) as f64;
        self.build(
            GridDimensions::cube(resolution),
            Vec3::zeros(),
            Vec3::new(h, h, h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_is_tangential() {
        let field = SyntheticField::Rotation { angular_speed: 2.0 };
        let center = Vec3::new(0.5, 0.5, 0.5);
        let p = Vec3::new(0.8, 0.5, 0.1);
        let v = field.velocity_at(p, center, 1.0);

        assert_relative_eq!(v, Vec3::new(0.0, 0.6, 0.0), epsilon = 1e-12);
        assert_relative_eq!(v.dot(&(p - center)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tornado_swirls_and_rises() {
        let field = SyntheticField::tornado();
        let center = Vec3::new(0.5, 0.5, 0.5);

        let near_floor = field.velocity_at(Vec3::new(0.8, 0.5, 0.0), center, 1.0);
        let near_lid = field.velocity_at(Vec3::new(0.8, 0.5, 1.0), center, 1.0);

        // Counter-clockwise swirl (+y at +x offset), inflow toward the axis
        assert!(near_floor.y > 0.0);
        assert!(near_floor.x < 0.0);
        // Updraft everywhere, weaker at the top
        assert!(near_floor.z > near_lid.z);
        assert!(near_lid.z > 0.0);
    }

    #[test]
    fn test_tornado_peak_swirl_at_core_radius() {
        let SyntheticField::Tornado {
            swirl, core_radius, ..
        } = SyntheticField::tornado()
        else {
            unreachable!()
        };
        let field = SyntheticField::Tornado {
            swirl,
            core_radius,
            inflow: 0.0,
            updraft: 0.0,
        };
        let center = Vec3::zeros();
        let speed = |r: f64| field.velocity_at(Vec3::new(r, 0.0, 0.0), center, 1.0).norm();

        assert_relative_eq!(speed(core_radius), swirl, epsilon = 1e-12);
        assert!(speed(core_radius * 0.5) < swirl);
        assert!(speed(core_radius * 2.0) < swirl);
        assert_eq!(speed(0.0), 0.0);
    }

    #[test]
    fn test_build_unit_cube_covers_domain() {
        let grid = SyntheticField::Uniform {
            velocity: Vec3::new(1.0, 0.0, 0.0),
        }
        .build_unit_cube(11)
        .unwrap();

        let (min, max) = grid.bounds();
        assert_relative_eq!(min, Vec3::zeros());
        assert_relative_eq!(max, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        assert!(grid.samples().iter().all(|v| *v == Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_build_unit_cube_rejects_tiny_resolution() {
        let field = SyntheticField::tornado();
        assert!(matches!(
            field.build_unit_cube(1),
            Err(GridError::InvalidSpacing { .. })
        ));
        assert!(matches!(
            field.build_unit_cube(0),
            Err(GridError::ZeroDimension { .. })
        ));
    }
}
