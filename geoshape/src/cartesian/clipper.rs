use serde::{Deserialize, Serialize};

use crate::cartesian::Vector2;

/// Closed polygon in a planar coordinate space, used for point-in-polygon tests.
///
/// The contour is implicitly closed: the last point must not repeat the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipperPath {
    points: Vec<Vector2>,
}

impl ClipperPath {
    /// Creates a new path from the given points.
    pub fn new(points: Vec<Vector2>) -> Self {
        Self { points }
    }

    /// Points of the contour.
    pub fn points(&self) -> &[Vector2] {
        &self.points
    }

    /// Returns true if the contour has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the segments of the contour, including the closing one.
    pub fn iter_segments(&self) -> impl Iterator<Item = (&Vector2, &Vector2)> {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
            .take(self.points.len())
    }

    /// Returns true if the `point` lies inside or on one of the polygon's sides.
    ///
    /// Uses non-zero winding rule, so the result does not depend on the orientation of the contour.
    pub fn contains_point(&self, point: &Vector2) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut wn = 0i64;
        let y = point.y();

        for (from, to) in self.iter_segments() {
            let side = is_left(from, to, point);
            if side == 0.0 && is_within_span(from, to, point) {
                return true;
            }

            if from.y() <= y {
                if to.y() > y && side > 0.0 {
                    wn += 1;
                }
            } else if to.y() <= y && side < 0.0 {
                wn -= 1;
            }
        }

        wn != 0
    }
}

impl FromIterator<Vector2> for ClipperPath {
    fn from_iter<T: IntoIterator<Item = Vector2>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Positive if `point` is to the left of the directed line `from -> to`, negative if to the right and zero if the
/// three points are collinear.
fn is_left(from: &Vector2, to: &Vector2, point: &Vector2) -> f64 {
    (to.x() - from.x()) * (point.y() - from.y()) - (point.x() - from.x()) * (to.y() - from.y())
}

fn is_within_span(from: &Vector2, to: &Vector2, point: &Vector2) -> bool {
    point.x() >= from.x().min(to.x())
        && point.x() <= from.x().max(to.x())
        && point.y() >= from.y().min(to.y())
        && point.y() <= from.y().max(to.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ClipperPath {
        ClipperPath::new(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, 0.0),
        ])
    }

    #[test]
    fn iter_segments() {
        let path = triangle();
        let segments: Vec<_> = path.iter_segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], (&Vector2::new(1.0, 0.0), &Vector2::new(0.0, 0.0)));

        assert_eq!(ClipperPath::default().iter_segments().count(), 0);
    }

    #[test]
    fn contains_point() {
        let polygon = triangle();

        assert!(polygon.contains_point(&Vector2::new(0.0, 0.0)));
        assert!(polygon.contains_point(&Vector2::new(1.0, 1.0)));
        assert!(polygon.contains_point(&Vector2::new(0.5, 0.0)));
        assert!(polygon.contains_point(&Vector2::new(0.2, 0.1)));
        assert!(!polygon.contains_point(&Vector2::new(0.2, 0.3)));
        assert!(!polygon.contains_point(&Vector2::new(0.2, -0.3)));
        assert!(!polygon.contains_point(&Vector2::new(1.1, 0.0)));
    }

    #[test]
    fn orientation_does_not_matter() {
        let cw = triangle();
        let ccw: ClipperPath = cw.points().iter().rev().copied().collect();

        for p in [Vector2::new(0.7, 0.3), Vector2::new(0.3, 0.7)] {
            assert_eq!(cw.contains_point(&p), ccw.contains_point(&p));
        }
    }

    #[test]
    fn degenerate_path_contains_nothing() {
        let line = ClipperPath::new(vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)]);
        assert!(!line.contains_point(&Vector2::new(0.5, 0.5)));
    }
}
