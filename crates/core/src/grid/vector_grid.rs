//! Regular 3D grid of vector samples
//!
//! The grid is the field domain the tracer integrates through. Samples live at
//! the nodes `origin + (i, j, k) ⊙ spacing` and are stored as a flattened 3D
//! array: `index = k * (ny * nx) + j * nx + i`.

use crate::core_types::Vec3;
use crate::error::{Axis, GridError};
use serde::{Deserialize, Serialize};

/// Number of samples along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDimensions {
    /// Create grid dimensions
    #[must_use]
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Same number of samples along every axis
    #[must_use]
    pub const fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Sample count along one axis
    #[must_use]
    pub const fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
            Axis::Z => self.nz,
        }
    }

    /// Total node count, `None` on overflow
    #[must_use]
    pub fn node_count(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(self.nz)
    }
}

/// Vector field sampled on a regular, axis-aligned 3D grid
///
/// Constructed once from an external data source (or one of the synthetic
/// builders) and then borrowed read-only by the integrator. Every node in
/// `[0, nx) × [0, ny) × [0, nz)` holds exactly one finite vector.
///
/// Deserialization runs the same checks as [`VectorGrid::new`], so a
/// malformed grid is rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVectorGrid")]
pub struct VectorGrid {
    /// Samples per axis
    dimensions: GridDimensions,

    /// World position of node (0, 0, 0)
    origin: Vec3,

    /// Distance between neighbouring nodes along each axis
    spacing: Vec3,

    /// Vector samples, flattened with x varying fastest
    samples: Vec<Vec3>,
}

/// Unchecked wire form of [`VectorGrid`]
#[derive(Deserialize)]
struct RawVectorGrid {
    dimensions: GridDimensions,
    origin: Vec3,
    spacing: Vec3,
    samples: Vec<Vec3>,
}

impl TryFrom<RawVectorGrid> for VectorGrid {
    type Error = GridError;

    fn try_from(raw: RawVectorGrid) -> Result<Self, Self::Error> {
        Self::new(raw.dimensions, raw.origin, raw.spacing, raw.samples)
    }
}

impl VectorGrid {
    /// Create a grid from an already-flattened sample buffer
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if a dimension is zero, the origin or spacing is
    /// not finite, spacing is not strictly positive, `samples` does not hold
    /// exactly `nx * ny * nz` vectors, or a sample is not finite.
    pub fn new(
        dimensions: GridDimensions,
        origin: Vec3,
        spacing: Vec3,
        samples: Vec<Vec3>,
    ) -> Result<Self, GridError> {
        let grid = Self {
            dimensions,
            origin,
            spacing,
            samples,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Create a grid by evaluating `field` at every node position
    ///
    /// Nodes are visited in storage order (x fastest, then y, then z).
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the dimensions, origin or spacing are invalid,
    /// in which case the field is not evaluated, or if `field` returns a
    /// non-finite vector.
    pub fn from_fn<F>(
        dimensions: GridDimensions,
        origin: Vec3,
        spacing: Vec3,
        mut field: F,
    ) -> Result<Self, GridError>
    where
        F: FnMut(Vec3) -> Vec3,
    {
        let node_count = Self::validate_geometry(&dimensions, &origin, &spacing)?;

        let mut samples = Vec::with_capacity(node_count);
        for k in 0..dimensions.nz {
            for j in 0..dimensions.ny {
                for i in 0..dimensions.nx {
                    let position = origin + spacing.component_mul(&node_offset(i, j, k));
                    samples.push(field(position));
                }
            }
        }
        Self::validate_samples(&samples)?;

        Ok(Self {
            dimensions,
            origin,
            spacing,
            samples,
        })
    }

    /// Create a grid holding the same vector at every node
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the dimensions, origin or spacing are invalid.
    pub fn uniform(
        dimensions: GridDimensions,
        origin: Vec3,
        spacing: Vec3,
        value: Vec3,
    ) -> Result<Self, GridError> {
        Self::from_fn(dimensions, origin, spacing, |_| value)
    }

    /// Check the structural invariants
    ///
    /// Every constructor and deserialization already enforce these, so a
    /// grid that exists always passes.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), GridError> {
        let expected = Self::validate_geometry(&self.dimensions, &self.origin, &self.spacing)?;
        if self.samples.len() != expected {
            return Err(GridError::SampleCountMismatch {
                expected,
                actual: self.samples.len(),
            });
        }
        Self::validate_samples(&self.samples)
    }

    fn validate_samples(samples: &[Vec3]) -> Result<(), GridError> {
        match samples
            .iter()
            .position(|v| !v.iter().all(|c| c.is_finite()))
        {
            Some(index) => Err(GridError::NonFiniteSample {
                index,
                value: samples[index],
            }),
            None => Ok(()),
        }
    }

    /// Validate dimensions, origin and spacing, returning the node count
    fn validate_geometry(
        dimensions: &GridDimensions,
        origin: &Vec3,
        spacing: &Vec3,
    ) -> Result<usize, GridError> {
        for (index, axis) in Axis::ALL.into_iter().enumerate() {
            if dimensions.along(axis) == 0 {
                return Err(GridError::ZeroDimension { axis });
            }
            let h = spacing[index];
            if !h.is_finite() || h <= 0.0 {
                return Err(GridError::InvalidSpacing { axis, value: h });
            }
            let o = origin[index];
            if !o.is_finite() {
                return Err(GridError::InvalidOrigin { axis, value: o });
            }
        }
        dimensions
            .node_count()
            .ok_or(GridError::DimensionOverflow)
    }

    /// Get flat array index from grid coordinates
    #[inline]
    #[must_use]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        k * (self.dimensions.ny * self.dimensions.nx) + j * self.dimensions.nx + i
    }

    /// Get the sample stored at a node, `None` outside the grid
    #[must_use]
    pub fn sample(&self, i: usize, j: usize, k: usize) -> Option<Vec3> {
        if i < self.dimensions.nx && j < self.dimensions.ny && k < self.dimensions.nz {
            Some(self.samples[self.index(i, j, k)])
        } else {
            None
        }
    }

    /// Sample at a node already known to be inside the grid
    #[inline]
    pub(crate) fn node(&self, i: usize, j: usize, k: usize) -> Vec3 {
        self.samples[self.index(i, j, k)]
    }

    /// World position of a node
    #[must_use]
    pub fn point_at(&self, i: usize, j: usize, k: usize) -> Vec3 {
        self.origin + self.spacing.component_mul(&node_offset(i, j, k))
    }

    /// Samples per axis
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// World position of node (0, 0, 0)
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Node spacing per axis
    #[must_use]
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Smallest spacing component
    #[must_use]
    pub fn min_spacing(&self) -> f64 {
        self.spacing.min()
    }

    /// All samples in storage order
    #[must_use]
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    /// Axis-aligned bounding box of the sampled domain as `(min, max)`
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let d = self.dimensions;
        (
            self.origin,
            self.point_at(d.nx - 1, d.ny - 1, d.nz - 1),
        )
    }

    /// Centre of the sampled domain
    #[must_use]
    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }
}

/// Integer node coordinates as a real-valued offset in cells
#[inline]
fn node_offset(i: usize, j: usize, k: usize) -> Vec3 {
    Vec3::new(i as f64, j as f64, k as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_spacing() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_index_layout_is_x_fastest() {
        let grid = VectorGrid::from_fn(
            GridDimensions::new(3, 4, 5),
            Vec3::zeros(),
            unit_spacing(),
            |p| p,
        )
        .unwrap();

        assert_eq!(grid.index(0, 0, 0), 0);
        assert_eq!(grid.index(1, 0, 0), 1);
        assert_eq!(grid.index(0, 1, 0), 3);
        assert_eq!(grid.index(0, 0, 1), 12);
        assert_eq!(grid.index(2, 3, 4), 59);
        assert_eq!(grid.samples().len(), 60);

        // Sample equals its own node position for the identity field
        assert_eq!(grid.sample(2, 1, 3), Some(Vec3::new(2.0, 1.0, 3.0)));
        assert_eq!(grid.sample(3, 0, 0), None);
    }

    #[test]
    fn test_point_at_uses_origin_and_spacing() {
        let grid = VectorGrid::uniform(
            GridDimensions::cube(4),
            Vec3::new(-1.0, 2.0, 10.0),
            Vec3::new(0.5, 2.0, 0.25),
            Vec3::zeros(),
        )
        .unwrap();

        assert_eq!(grid.point_at(2, 1, 3), Vec3::new(0.0, 4.0, 10.75));
        let (min, max) = grid.bounds();
        assert_eq!(min, Vec3::new(-1.0, 2.0, 10.0));
        assert_eq!(max, Vec3::new(0.5, 8.0, 10.75));
        assert_eq!(grid.min_spacing(), 0.25);
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let err = VectorGrid::uniform(
            GridDimensions::new(4, 0, 4),
            Vec3::zeros(),
            unit_spacing(),
            Vec3::zeros(),
        )
        .unwrap_err();
        assert_eq!(err, GridError::ZeroDimension { axis: Axis::Y });
    }

    #[test]
    fn test_rejects_non_positive_spacing() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let result = VectorGrid::uniform(
                GridDimensions::cube(2),
                Vec3::zeros(),
                Vec3::new(1.0, 1.0, bad),
                Vec3::zeros(),
            );
            assert!(
                matches!(
                    result,
                    Err(GridError::InvalidSpacing { axis: Axis::Z, .. })
                ),
                "spacing {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_origin() {
        let result = VectorGrid::uniform(
            GridDimensions::cube(2),
            Vec3::new(f64::NAN, 0.0, 0.0),
            unit_spacing(),
            Vec3::zeros(),
        );
        assert!(matches!(
            result,
            Err(GridError::InvalidOrigin { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn test_rejects_missing_samples() {
        let err = VectorGrid::new(
            GridDimensions::cube(2),
            Vec3::zeros(),
            unit_spacing(),
            vec![Vec3::zeros(); 7],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GridError::SampleCountMismatch {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        let err = VectorGrid::uniform(
            GridDimensions::new(usize::MAX, 2, 1),
            Vec3::zeros(),
            unit_spacing(),
            Vec3::zeros(),
        )
        .unwrap_err();
        assert_eq!(err, GridError::DimensionOverflow);
    }

    #[test]
    fn test_rejects_non_finite_sample() {
        let mut samples = vec![Vec3::new(1.0, 0.0, 0.0); 8];
        samples[5].y = f64::NAN;
        let err = VectorGrid::new(
            GridDimensions::cube(2),
            Vec3::zeros(),
            unit_spacing(),
            samples,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::NonFiniteSample { index: 5, .. }));

        let result = VectorGrid::from_fn(
            GridDimensions::cube(2),
            Vec3::zeros(),
            unit_spacing(),
            |p| Vec3::new(1.0 / p.x, 0.0, 0.0),
        );
        assert!(matches!(
            result,
            Err(GridError::NonFiniteSample { index: 0, .. })
        ));
    }

    #[test]
    fn test_deserialization_rejects_malformed_grid() {
        let json = r#"{
            "dimensions": { "nx": 2, "ny": 2, "nz": 2 },
            "origin": [0.0, 0.0, 0.0],
            "spacing": [1.0, 1.0, 1.0],
            "samples": [[1.0, 0.0, 0.0]]
        }"#;
        let err = serde_json::from_str::<VectorGrid>(json).unwrap_err();
        assert!(err.to_string().contains("expects 8 vector samples, got 1"));

        let json = r#"{
            "dimensions": { "nx": 1, "ny": 1, "nz": 1 },
            "origin": [0.0, 0.0, 0.0],
            "spacing": [0.0, 1.0, 1.0],
            "samples": [[1.0, 0.0, 0.0]]
        }"#;
        assert!(serde_json::from_str::<VectorGrid>(json).is_err());
    }

    #[test]
    fn test_serialized_grid_loads_back() {
        let grid = VectorGrid::from_fn(
            GridDimensions::new(3, 2, 2),
            Vec3::new(0.5, 0.0, -1.0),
            Vec3::new(0.25, 1.0, 2.0),
            |p| p,
        )
        .unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let loaded: VectorGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, grid);
        assert!(loaded.validate().is_ok());
    }
}
