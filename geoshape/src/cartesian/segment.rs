use nalgebra::{RealField, Scalar};

use crate::cartesian::Vector2;

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<Num: Scalar = f64>(pub Vector2<Num>, pub Vector2<Num>);

impl<Num: RealField + Copy> Segment<Num> {
    /// Position of the orthogonal projection of `point` onto the line of the segment, as a fraction of the segment:
    /// `0` is the start point, `1` is the end point. Returns `None` for a degenerate (zero length) segment.
    pub fn projection_param(&self, point: &Vector2<Num>) -> Option<Num> {
        let ds = self.1 - self.0;
        let ds_len = ds.length_sq();
        if ds_len.is_zero() {
            return None;
        }

        Some((*point - self.0).dot(&ds) / ds_len)
    }

    /// Point of the segment closest to `point`:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the foot of the normal is returned
    /// * otherwise the closer one of the segment's endpoints is returned
    pub fn closest_point(&self, point: &Vector2<Num>) -> Vector2<Num> {
        let Some(r) = self.projection_param(point) else {
            return self.0;
        };

        if r <= Num::zero() {
            self.0
        } else if r >= Num::one() {
            self.1
        } else {
            self.0 + (self.1 - self.0) * r
        }
    }

    /// Shortest euclidean distance (squared) between a point and the segment.
    pub fn distance_to_point_sq(&self, point: &Vector2<Num>) -> Num {
        (*point - self.closest_point(point)).length_sq()
    }
}
