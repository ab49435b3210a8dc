//! Builder for relative segment paths.
//!
//! Every outline in a template net is a start point plus a list of relative
//! steps, the same shape a canvas path takes. The builder keeps a cursor so
//! callers can ask where the pen is after any step.

use crate::canvas::Segment;
use crate::types::{OffsetMm, PointMm, offset};

/// Relative path under construction
///
/// ```ignore
/// let mut builder = PathBuilder::new(corner);
/// builder.line_by(w, 0.0);
/// builder.curve_by((0.0, -a), (-a, -a), (-a, -a));
/// let (start, segments) = builder.build();
/// ```
#[derive(Debug, Clone)]
pub struct PathBuilder {
    start: PointMm,
    cursor: PointMm,
    segments: Vec<Segment>,
}

impl PathBuilder {
    pub fn new(start: PointMm) -> Self {
        Self {
            start,
            cursor: start,
            segments: Vec::new(),
        }
    }

    /// Straight step by a millimetre delta.
    pub fn line_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.push(Segment::Line { to: offset(dx, dy) })
    }

    /// Cubic step; both control points and the end are relative to the
    /// current pen position.
    pub fn curve_by(&mut self, c1: (f64, f64), c2: (f64, f64), to: (f64, f64)) -> &mut Self {
        self.push(Segment::Curve {
            c1: offset(c1.0, c1.1),
            c2: offset(c2.0, c2.1),
            to: offset(to.0, to.1),
        })
    }

    fn push(&mut self, segment: Segment) -> &mut Self {
        self.cursor = self.cursor + segment.end();
        self.segments.push(segment);
        self
    }

    /// Total displacement from the start to the pen
    pub fn displacement(&self) -> OffsetMm {
        self.cursor - self.start
    }

    pub fn start(&self) -> PointMm {
        self.start
    }

    /// Current pen position
    pub fn end(&self) -> PointMm {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pen positions after each step, starting with the start point.
    pub fn points(&self) -> Vec<PointMm> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        let mut at = self.start;
        points.push(at);
        for segment in &self.segments {
            at = at + segment.end();
            points.push(at);
        }
        points
    }

    /// Build and return the start point and steps.
    pub fn build(self) -> (PointMm, Vec<Segment>) {
        (self.start, self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pt;

    fn assert_point_eq(actual: PointMm, expected: PointMm) {
        const EPSILON: f64 = 1e-10;
        assert!(
            (actual.x.raw() - expected.x.raw()).abs() < EPSILON
                && (actual.y.raw() - expected.y.raw()).abs() < EPSILON,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn empty_path_stays_at_start() {
        let builder = PathBuilder::new(pt(3.0, 4.0));
        assert!(builder.is_empty());
        assert_eq!(builder.end(), pt(3.0, 4.0));
        assert_eq!(builder.points(), vec![pt(3.0, 4.0)]);
    }

    #[test]
    fn steps_accumulate() {
        let mut builder = PathBuilder::new(pt(0.0, 0.0));
        builder.line_by(10.0, 0.0).line_by(0.0, -5.0);
        assert_eq!(builder.len(), 2);
        assert_point_eq(builder.end(), pt(10.0, -5.0));
    }

    #[test]
    fn curves_move_the_pen_to_their_end_only() {
        let mut builder = PathBuilder::new(pt(0.0, 0.0));
        builder.curve_by((0.0, -3.0), (-3.0, -3.0), (-3.0, -3.0));
        assert_point_eq(builder.end(), pt(-3.0, -3.0));
    }

    #[test]
    fn trapezoid_closes_except_the_last_edge() {
        // Bottom edge, slanted right side, top edge; the close draws the rest.
        let mut builder = PathBuilder::new(pt(0.0, 10.0));
        builder.line_by(20.0, 0.0).line_by(-2.0, -10.0).line_by(-16.0, 0.0);
        let points = builder.points();
        assert_point_eq(points[3], pt(2.0, 0.0));
        assert_eq!(builder.displacement(), offset(2.0, -10.0));
        let (start, segments) = builder.build();
        assert_eq!(start, pt(0.0, 10.0));
        assert_eq!(segments.len(), 3);
    }
}
