//! Traced streamline and its polyline connectivity
//!
//! A [`Streamline`] is the ordered point sequence handed to the output side:
//! the backward segment in reverse-chronological order, the seed exactly once,
//! then the forward segment. Connectivity is always a single [`Polyline`]
//! visiting every point in order.

use crate::core_types::Vec3;
use crate::integrator::DirectionSummary;
use serde::Serialize;

/// Ordered, non-empty sequence of positions along one streamline
///
/// Immutable once built by the tracer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Streamline {
    /// Backward points (reversed), seed, forward points
    points: Vec<Vec3>,

    /// Position of the seed in `points`
    seed_index: usize,

    /// How the backward direction ended
    backward: DirectionSummary,

    /// How the forward direction ended
    forward: DirectionSummary,
}

impl Streamline {
    /// Join both directions around the seed
    ///
    /// `backward_points` and `forward_points` are in chronological order as
    /// produced by integration.
    pub(crate) fn assemble(
        seed: Vec3,
        backward_points: Vec<Vec3>,
        forward_points: Vec<Vec3>,
        backward: DirectionSummary,
        forward: DirectionSummary,
    ) -> Self {
        let seed_index = backward_points.len();

        let mut points = Vec::with_capacity(backward_points.len() + 1 + forward_points.len());
        points.extend(backward_points.into_iter().rev());
        points.push(seed);
        points.extend(forward_points);

        Self {
            points,
            seed_index,
            backward,
            forward,
        }
    }

    /// All points in polyline order
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Take ownership of the point sequence
    #[must_use]
    pub fn into_points(self) -> Vec<Vec3> {
        self.points
    }

    /// Number of points, including the seed
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a streamline contains at least its seed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when neither direction took a step
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() == 1
    }

    /// Index of the seed, separating backward and forward segments
    #[must_use]
    pub fn seed_index(&self) -> usize {
        self.seed_index
    }

    /// The seed point
    #[must_use]
    pub fn seed(&self) -> Vec3 {
        self.points[self.seed_index]
    }

    /// Backward points, ordered from the far end toward the seed
    #[must_use]
    pub fn backward_points(&self) -> &[Vec3] {
        &self.points[..self.seed_index]
    }

    /// Forward points, ordered from the seed outward
    #[must_use]
    pub fn forward_points(&self) -> &[Vec3] {
        &self.points[self.seed_index + 1..]
    }

    /// How the backward direction ended
    #[must_use]
    pub fn backward(&self) -> DirectionSummary {
        self.backward
    }

    /// How the forward direction ended
    #[must_use]
    pub fn forward(&self) -> DirectionSummary {
        self.forward
    }

    /// Signed integration step of each point: negative backward, 0 at the seed
    pub fn step_offsets(&self) -> impl Iterator<Item = i64> + '_ {
        let seed = self.seed_index as i64;
        (0..self.points.len()).map(move |i| i as i64 - seed)
    }

    /// Total length of the polyline
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// Connectivity record for the single line through every point
    #[must_use]
    pub fn polyline(&self) -> Polyline {
        Polyline::through(self.points.len())
    }

    /// Consecutive `(from, to)` point indices, one per line segment
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> {
        (1..self.points.len()).map(|i| (i - 1, i))
    }
}

/// A single polyline cell referencing points by position
///
/// There is no branching and no cycle: ids are `0..n` in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Polyline {
    point_ids: Vec<usize>,
}

impl Polyline {
    /// Polyline through points `0..point_count` in order
    #[must_use]
    pub fn through(point_count: usize) -> Self {
        Self {
            point_ids: (0..point_count).collect(),
        }
    }

    /// Point ids in visiting order
    #[must_use]
    pub fn point_ids(&self) -> &[usize] {
        &self.point_ids
    }

    /// Number of referenced points
    #[must_use]
    pub fn len(&self) -> usize {
        self.point_ids.len()
    }

    /// True if no point is referenced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.point_ids.is_empty()
    }

    /// Consecutive `(from, to)` point pairs, one per line segment
    ///
    /// A single-point polyline has no segments.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.point_ids.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::TerminationReason;
    use approx::assert_relative_eq;

    fn summary(steps: usize) -> DirectionSummary {
        DirectionSummary {
            steps,
            reason: TerminationReason::OutOfBounds,
        }
    }

    fn sample_line() -> Streamline {
        // Backward integration produced x = -1 then x = -2
        let backward = vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)];
        let forward = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)];
        Streamline::assemble(Vec3::zeros(), backward, forward, summary(2), summary(2))
    }

    #[test]
    fn test_assembly_order() {
        let line = sample_line();
        let xs: Vec<f64> = line.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-2.0, -1.0, 0.0, 1.0, 1.0]);
        assert_eq!(line.seed_index(), 2);
        assert_eq!(line.seed(), Vec3::zeros());
        assert_eq!(line.backward_points().len(), 2);
        assert_eq!(line.forward_points().len(), 2);
    }

    #[test]
    fn test_step_offsets_centre_on_seed() {
        let offsets: Vec<i64> = sample_line().step_offsets().collect();
        assert_eq!(offsets, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_arc_length() {
        assert_relative_eq!(sample_line().arc_length(), 4.0);
    }

    #[test]
    fn test_polyline_visits_each_point_once() {
        let line = sample_line();
        let polyline = line.polyline();
        assert_eq!(polyline.point_ids(), &[0, 1, 2, 3, 4]);
        let segments: Vec<_> = polyline.segments().collect();
        assert_eq!(segments, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
        assert!(line.segments().eq(polyline.segments()));
    }

    #[test]
    fn test_degenerate_line() {
        let line = Streamline::assemble(
            Vec3::new(1.0, 2.0, 3.0),
            Vec::new(),
            Vec::new(),
            summary(0),
            summary(0),
        );
        assert!(line.is_degenerate());
        assert!(!line.is_empty());
        assert_eq!(line.seed_index(), 0);
        assert_eq!(line.arc_length(), 0.0);
        assert_eq!(line.polyline().len(), 1);
        assert_eq!(line.polyline().segments().count(), 0);
        assert_eq!(line.segments().count(), 0);
        assert!(line.forward_points().is_empty());
    }
}
