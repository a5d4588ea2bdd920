//! Trilinear interpolation of a [`VectorGrid`] at arbitrary world positions
//!
//! # Theory
//!
//! A world point `p` maps to continuous grid coordinates
//!
//! ```text
//! g = (p - origin) / spacing        (per axis)
//! ```
//!
//! With `(i, j, k) = floor(g)` and `(fx, fy, fz) = g - (i, j, k)`, the field
//! value is the blend of the eight corner samples of the enclosing cell:
//!
//! ```text
//! V = Σ_{c ∈ {0,1}³} w_c · S(i + cx, j + cy, k + cz)
//! w_c = (cx ? fx : 1 - fx) · (cy ? fy : 1 - fy) · (cz ? fz : 1 - fz)
//! ```
//!
//! The weights are non-negative and sum to one, so every component of `V`
//! lies between the smallest and largest value of that component among the
//! eight corners.

use super::VectorGrid;
use crate::core_types::Vec3;

/// Continuous grid coordinates within this many cells of an integer are
/// treated as lying exactly on that node.
///
/// `origin + i * spacing` is rarely representable, so the round trip through
/// world space would otherwise land a hair off the node and blend in its
/// neighbours.
pub const NODE_SNAP_TOLERANCE: f64 = 1e-9;

/// Out-of-range slack on a continuous coordinate, in units of `f64::EPSILON`
/// scaled by the coordinate's magnitude
///
/// Only absorbs rounding in the world-to-grid mapping. Snapping to a node
/// never widens the domain.
const BOUNDS_ROUNDING_ULPS: f64 = 4.0;

/// The queried point lies outside the sampled domain
///
/// This is the normal way a streamline leaves the field, not a programming
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutOfBounds;

impl std::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point lies outside the sampled domain")
    }
}

impl std::error::Error for OutOfBounds {}

/// Anything that can answer "what is the field vector at this point?"
///
/// Implementations must be pure: the same point always yields the same
/// result, and sampling never mutates shared state, so one sampler can be
/// queried from many threads at once.
pub trait FieldSampler: Send + Sync {
    /// Field vector at a world position
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if `point` lies outside the sampled domain.
    fn sample_at(&self, point: &Vec3) -> Result<Vec3, OutOfBounds>;
}

impl FieldSampler for VectorGrid {
    #[inline]
    fn sample_at(&self, point: &Vec3) -> Result<Vec3, OutOfBounds> {
        interpolate(self, point)
    }
}

/// Enclosing cell along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisCell {
    /// Lower node index
    lo: usize,
    /// Upper node index (equals `lo` on a single-sample axis)
    hi: usize,
    /// Fractional position between `lo` and `hi`
    frac: f64,
}

/// Locate the cell enclosing continuous coordinate `g` on an axis of `n` samples
///
/// Returns `None` when `g` lies outside `[0, n - 1]` by more than rounding
/// error, or is not finite. On the upper face the last cell is used with
/// `frac == 1`.
#[inline]
fn locate(g: f64, n: usize) -> Option<AxisCell> {
    if !g.is_finite() {
        return None;
    }

    let last = n.checked_sub(1)? as f64;
    let slack = BOUNDS_ROUNDING_ULPS * f64::EPSILON * g.abs().max(1.0);
    if g < -slack || g > last + slack {
        return None;
    }

    let nearest = g.round();
    let g = if (g - nearest).abs() <= NODE_SNAP_TOLERANCE {
        nearest
    } else {
        g
    };
    let g = g.clamp(0.0, last);

    if n == 1 {
        return Some(AxisCell {
            lo: 0,
            hi: 0,
            frac: 0.0,
        });
    }

    let lo = (g.floor() as usize).min(n - 2);
    Some(AxisCell {
        lo,
        hi: lo + 1,
        frac: g - lo as f64,
    })
}

/// Get the field vector at any world position using trilinear interpolation
///
/// # Errors
///
/// Returns [`OutOfBounds`] if any continuous grid coordinate falls outside
/// `[0, n - 1]` on its axis.
pub fn interpolate(grid: &VectorGrid, point: &Vec3) -> Result<Vec3, OutOfBounds> {
    let dims = grid.dimensions();
    let g = (point - grid.origin()).component_div(&grid.spacing());

    let cx = locate(g.x, dims.nx).ok_or(OutOfBounds)?;
    let cy = locate(g.y, dims.ny).ok_or(OutOfBounds)?;
    let cz = locate(g.z, dims.nz).ok_or(OutOfBounds)?;

    let (fx, fy, fz) = (cx.frac, cy.frac, cz.frac);

    // Trilinear interpolation of 8 corners
    let w000 = grid.node(cx.lo, cy.lo, cz.lo) * ((1.0 - fx) * (1.0 - fy) * (1.0 - fz));
    let w100 = grid.node(cx.hi, cy.lo, cz.lo) * (fx * (1.0 - fy) * (1.0 - fz));
    let w010 = grid.node(cx.lo, cy.hi, cz.lo) * ((1.0 - fx) * fy * (1.0 - fz));
    let w110 = grid.node(cx.hi, cy.hi, cz.lo) * (fx * fy * (1.0 - fz));
    let w001 = grid.node(cx.lo, cy.lo, cz.hi) * ((1.0 - fx) * (1.0 - fy) * fz);
    let w101 = grid.node(cx.hi, cy.lo, cz.hi) * (fx * (1.0 - fy) * fz);
    let w011 = grid.node(cx.lo, cy.hi, cz.hi) * ((1.0 - fx) * fy * fz);
    let w111 = grid.node(cx.hi, cy.hi, cz.hi) * (fx * fy * fz);

    Ok(w000 + w100 + w010 + w110 + w001 + w101 + w011 + w111)
}
