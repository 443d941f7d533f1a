use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::coordinate::GeoCoordinate;
use crate::shape::{is_valid_offset, GeoShape, ShapeType};

/// Rectangular geographic area given by its top left and bottom right corners.
///
/// If the longitude of the top left corner is greater than the longitude of the bottom right corner, the rectangle
/// crosses the antimeridian. A rectangle never crosses a pole: operations that would move an edge past a pole clamp
/// it at the pole instead.
///
/// A rectangle is valid if both corners are valid and the top left corner is not south of the bottom right one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoRectangle {
    top_left: GeoCoordinate,
    bottom_right: GeoCoordinate,
}

impl GeoRectangle {
    /// Creates a new rectangle from its corners.
    pub fn new(top_left: GeoCoordinate, bottom_right: GeoCoordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Creates a rectangle centered at `center` with the given `width` and `height` in degrees.
    ///
    /// If the height would take the rectangle past a pole, it is truncated so that the rectangle touches the pole and
    /// `center` stays in the middle.
    pub fn from_center(center: GeoCoordinate, width: f64, height: f64) -> Self {
        let mut rect = Self::new(center, center);
        rect.set_width(width);
        rect.set_height(height);
        rect
    }

    /// Smallest rectangle containing all given coordinates. Returns an invalid rectangle if `coordinates` is empty.
    pub fn from_coordinates(coordinates: &[GeoCoordinate]) -> Self {
        let Some(first) = coordinates.first() else {
            return Self::default();
        };

        let mut rect = Self::new(*first, *first);
        for coordinate in &coordinates[1..] {
            rect.extend_shape(coordinate);
        }

        rect
    }

    /// Top left corner.
    pub fn top_left(&self) -> GeoCoordinate {
        self.top_left
    }

    /// Sets the top left corner.
    pub fn set_top_left(&mut self, top_left: GeoCoordinate) {
        self.top_left = top_left;
    }

    /// Top right corner. Invalid coordinate if the rectangle is invalid.
    pub fn top_right(&self) -> GeoCoordinate {
        if !self.is_valid() {
            return GeoCoordinate::default();
        }

        GeoCoordinate::new(self.top_left.latitude(), self.bottom_right.longitude())
    }

    /// Sets the top right corner.
    pub fn set_top_right(&mut self, top_right: GeoCoordinate) {
        self.top_left.set_latitude(top_right.latitude());
        self.bottom_right.set_longitude(top_right.longitude());
    }

    /// Bottom left corner. Invalid coordinate if the rectangle is invalid.
    pub fn bottom_left(&self) -> GeoCoordinate {
        if !self.is_valid() {
            return GeoCoordinate::default();
        }

        GeoCoordinate::new(self.bottom_right.latitude(), self.top_left.longitude())
    }

    /// Sets the bottom left corner.
    pub fn set_bottom_left(&mut self, bottom_left: GeoCoordinate) {
        self.bottom_right.set_latitude(bottom_left.latitude());
        self.top_left.set_longitude(bottom_left.longitude());
    }

    /// Bottom right corner.
    pub fn bottom_right(&self) -> GeoCoordinate {
        self.bottom_right
    }

    /// Sets the bottom right corner.
    pub fn set_bottom_right(&mut self, bottom_right: GeoCoordinate) {
        self.bottom_right = bottom_right;
    }

    /// Returns true if the rectangle crosses the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.top_left.longitude() > self.bottom_right.longitude()
    }

    /// Returns true if the rectangle covers all longitudes.
    pub fn is_full_longitude(&self) -> bool {
        self.top_left.longitude() == -180.0 && self.bottom_right.longitude() == 180.0
    }

    /// Moves the rectangle so that its center is at `center`, keeping its width and height.
    ///
    /// If this would make the rectangle cross a pole, the height is truncated so that the rectangle only touches
    /// the pole and `center` stays in the middle.
    pub fn set_center(&mut self, center: GeoCoordinate) {
        let width = self.width();
        let height = self.height();

        let mut tl_lat = center.latitude() + height / 2.0;
        let mut br_lat = center.latitude() - height / 2.0;
        let mut tl_lon = wrap_once(center.longitude() - width / 2.0);
        let mut br_lon = wrap_once(center.longitude() + width / 2.0);

        (tl_lat, br_lat) = clamp_lat_span(tl_lat, br_lat, center.latitude());

        if width == 360.0 {
            tl_lon = -180.0;
            br_lon = 180.0;
        }

        self.top_left = GeoCoordinate::new(tl_lat, tl_lon);
        self.bottom_right = GeoCoordinate::new(br_lat, br_lon);
    }

    /// Width in degrees. `NaN` for an invalid rectangle.
    pub fn width(&self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }

        let mut width = self.bottom_right.longitude() - self.top_left.longitude();
        if width < 0.0 {
            width += 360.0;
        }
        if width > 360.0 {
            width -= 360.0;
        }

        width
    }

    /// Sets the width in degrees keeping the center.
    ///
    /// Does nothing if the rectangle is invalid or `width` is negative. A width of 360 or more makes the rectangle
    /// cover all longitudes.
    pub fn set_width(&mut self, width: f64) {
        if !self.is_valid() || width.is_nan() || width < 0.0 {
            log::trace!("Rejected rectangle width {width}");
            return;
        }

        if width >= 360.0 {
            self.top_left.set_longitude(-180.0);
            self.bottom_right.set_longitude(180.0);
            return;
        }

        let center = self.center();
        self.top_left = GeoCoordinate::new(
            self.top_left.latitude(),
            wrap_once(center.longitude() - width / 2.0),
        );
        self.bottom_right = GeoCoordinate::new(
            self.bottom_right.latitude(),
            wrap_once(center.longitude() + width / 2.0),
        );
    }

    /// Height in degrees. `NaN` for an invalid rectangle.
    pub fn height(&self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }

        self.top_left.latitude() - self.bottom_right.latitude()
    }

    /// Sets the height in degrees keeping the center.
    ///
    /// Does nothing if the rectangle is invalid or `height` is negative. The height is truncated so that the
    /// rectangle does not cross a pole.
    pub fn set_height(&mut self, height: f64) {
        if !self.is_valid() || height.is_nan() || height < 0.0 {
            log::trace!("Rejected rectangle height {height}");
            return;
        }

        let height = height.min(180.0);
        let center = self.center();
        let (tl_lat, br_lat) = clamp_lat_span(
            center.latitude() + height / 2.0,
            center.latitude() - height / 2.0,
            center.latitude(),
        );

        self.top_left = GeoCoordinate::new(tl_lat, self.top_left.longitude());
        self.bottom_right = GeoCoordinate::new(br_lat, self.bottom_right.longitude());
    }

    /// Returns true if all corners of the `other` rectangle are inside this one.
    pub fn contains_rectangle(&self, other: &GeoRectangle) -> bool {
        self.contains(&other.top_left())
            && self.contains(&other.top_right())
            && self.contains(&other.bottom_left())
            && self.contains(&other.bottom_right())
    }

    /// Returns true if the rectangles have common points.
    ///
    /// Two rectangles that both touch the same pole always intersect.
    pub fn intersects(&self, other: &GeoRectangle) -> bool {
        let (left1, right1) = (self.top_left.longitude(), self.bottom_right.longitude());
        let (top1, bottom1) = (self.top_left.latitude(), self.bottom_right.latitude());
        let (left2, right2) = (other.top_left.longitude(), other.bottom_right.longitude());
        let (top2, bottom2) = (other.top_left.latitude(), other.bottom_right.latitude());

        if top1 < bottom2 || bottom1 > top2 {
            return false;
        }

        if (top1 == 90.0 && top2 == 90.0) || (bottom1 == -90.0 && bottom2 == -90.0) {
            return true;
        }

        match (left1 <= right1, left2 <= right2) {
            (true, true) => !(left1 > right2 || right1 < left2),
            (true, false) => !(left1 > right2 && right1 < left2),
            (false, true) => !(left2 > right1 && right2 < left1),
            // Two rectangles crossing the antimeridian always share it.
            (false, false) => true,
        }
    }

    /// Moves the rectangle by `d_lat` degrees northward and `d_lon` degrees eastward.
    ///
    /// Edges are clamped at the poles. A rectangle covering all latitudes or all longitudes keeps covering them.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        if !is_valid_offset(d_lat, d_lon) {
            return;
        }

        let mut tl_lat = self.top_left.latitude();
        let mut br_lat = self.bottom_right.latitude();
        let mut tl_lon = self.top_left.longitude();
        let mut br_lon = self.bottom_right.longitude();

        if tl_lat != 90.0 || br_lat != -90.0 {
            tl_lat += d_lat;
            br_lat += d_lat;
        }

        if !self.is_full_longitude() {
            tl_lon = wrap_once(tl_lon + d_lon % 360.0);
            br_lon = wrap_once(br_lon + d_lon % 360.0);
        }

        self.top_left = GeoCoordinate::new(tl_lat.clamp(-90.0, 90.0), tl_lon);
        self.bottom_right = GeoCoordinate::new(br_lat.clamp(-90.0, 90.0), br_lon);
    }

    /// Returns a copy of the rectangle moved by `d_lat` degrees northward and `d_lon` degrees eastward.
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = *self;
        result.translate(d_lat, d_lon);
        result
    }

    /// Smallest rectangle containing both this and the `other` rectangle.
    ///
    /// If exactly one of the rectangles crosses the antimeridian and they do not overlap, the narrower of the two
    /// possible results is chosen.
    pub fn united(&self, other: &GeoRectangle) -> Self {
        let mut result = *self;
        result |= *other;
        result
    }
}

impl GeoShape for GeoRectangle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Rectangle
    }

    fn is_valid(&self) -> bool {
        self.top_left.is_valid()
            && self.bottom_right.is_valid()
            && self.top_left.latitude() >= self.bottom_right.latitude()
    }

    fn is_empty(&self) -> bool {
        !self.is_valid()
            || self.top_left.latitude() == self.bottom_right.latitude()
            || self.top_left.longitude() == self.bottom_right.longitude()
    }

    fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        if !self.is_valid() || !coordinate.is_valid() {
            return false;
        }

        let left = self.top_left.longitude();
        let right = self.bottom_right.longitude();
        let top = self.top_left.latitude();
        let bottom = self.bottom_right.latitude();
        let lat = coordinate.latitude();
        let lon = coordinate.longitude();

        if lat > top || lat < bottom {
            return false;
        }

        if (lat == 90.0 && top == 90.0) || (lat == -90.0 && bottom == -90.0) {
            return true;
        }

        if left <= right {
            lon >= left && lon <= right
        } else {
            lon >= left || lon <= right
        }
    }

    fn center(&self) -> GeoCoordinate {
        if !self.is_valid() {
            return GeoCoordinate::default();
        }

        let lat = (self.top_left.latitude() + self.bottom_right.latitude()) / 2.0;
        let mut lon = (self.top_left.longitude() + self.bottom_right.longitude()) / 2.0;
        if self.crosses_antimeridian() {
            lon -= 180.0;
        }

        GeoCoordinate::new(lat, wrap_once(lon))
    }

    fn bounding_geo_rectangle(&self) -> GeoRectangle {
        *self
    }

    fn extend_shape(&mut self, coordinate: &GeoCoordinate) {
        if !self.is_valid() || !coordinate.is_valid() || self.contains(coordinate) {
            return;
        }

        let mut left = self.top_left.longitude();
        let mut right = self.bottom_right.longitude();
        let mut top = self.top_left.latitude();
        let mut bottom = self.bottom_right.latitude();
        let lat = coordinate.latitude();
        let lon = coordinate.longitude();

        top = top.max(lat);
        bottom = bottom.min(lat);

        if left > right {
            if lon > right && lon < left {
                if lon - right < left - lon {
                    right = lon;
                } else {
                    left = lon;
                }
            }
        } else if lon < left {
            if 360.0 - (right - lon) < left - lon {
                right = lon;
            } else {
                left = lon;
            }
        } else if lon > right {
            if 360.0 - (lon - left) < lon - right {
                left = lon;
            } else {
                right = lon;
            }
        }

        self.top_left = GeoCoordinate::new(top, left);
        self.bottom_right = GeoCoordinate::new(bottom, right);
    }
}

impl BitOrAssign for GeoRectangle {
    fn bitor_assign(&mut self, other: Self) {
        let (left1, right1) = (self.top_left.longitude(), self.bottom_right.longitude());
        let (left2, right2) = (other.top_left.longitude(), other.bottom_right.longitude());

        let top = self.top_left.latitude().max(other.top_left.latitude());
        let bottom = self.bottom_right.latitude().min(other.bottom_right.latitude());

        let wrap1 = left1 > right1;
        let wrap2 = left2 > right2;

        let (mut left, mut right) = if wrap1 == wrap2 {
            (left1.min(left2), right1.max(right2))
        } else {
            let ((wrap_left, wrap_right), (plain_left, plain_right)) = if wrap1 {
                ((left1, right1), (left2, right2))
            } else {
                ((left2, right2), (left1, right1))
            };

            let join_left = plain_right >= wrap_left;
            let join_right = plain_left <= wrap_right;

            match (join_left, join_right) {
                (true, true) => (-180.0, 180.0),
                (true, false) => (plain_left, wrap_right),
                (false, true) => (wrap_left, plain_right),
                (false, false) => {
                    let gap_right = plain_left - wrap_right;
                    let gap_left = wrap_left - plain_right;
                    if gap_left == gap_right {
                        (-180.0, 180.0)
                    } else if gap_left < gap_right {
                        (plain_left, wrap_right)
                    } else {
                        (wrap_left, plain_right)
                    }
                }
            }
        };

        if self.is_full_longitude() || other.is_full_longitude() {
            left = -180.0;
            right = 180.0;
        }

        self.top_left = GeoCoordinate::new(top, left);
        self.bottom_right = GeoCoordinate::new(bottom, right);
    }
}

impl BitOr for GeoRectangle {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl Display for GeoRectangle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeoRectangle({{{}}}, {{{}}})", self.top_left, self.bottom_right)
    }
}

/// Brings a longitude that is at most one turn off back into `[-180, 180]`.
fn wrap_once(lon: f64) -> f64 {
    if lon < -180.0 {
        lon + 360.0
    } else if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Truncates a latitude span that crosses a pole so that it touches the pole and stays centered at `center_lat`.
fn clamp_lat_span(mut top: f64, mut bottom: f64, center_lat: f64) -> (f64, f64) {
    if top > 90.0 {
        bottom = 2.0 * center_lat - 90.0;
        top = 90.0;
    }
    if top < -90.0 {
        bottom = -90.0;
        top = -90.0;
    }
    if bottom > 90.0 {
        top = 90.0;
        bottom = 90.0;
    }
    if bottom < -90.0 {
        top = 2.0 * center_lat + 90.0;
        bottom = -90.0;
    }

    (top, bottom)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn rect(top: f64, left: f64, bottom: f64, right: f64) -> GeoRectangle {
        GeoRectangle::new(GeoCoordinate::new(top, left), GeoCoordinate::new(bottom, right))
    }

    #[test]
    fn validity_and_emptiness() {
        assert!(!GeoRectangle::default().is_valid());
        assert!(GeoRectangle::default().is_empty());

        assert!(rect(10.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!rect(10.0, 0.0, 0.0, 10.0).is_empty());
        assert!(!rect(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(rect(10.0, 0.0, 10.0, 10.0).is_empty());
        assert!(rect(10.0, 5.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn antimeridian_containment() {
        let rect = rect(10.0, 170.0, -10.0, -170.0);

        assert!(rect.contains(&GeoCoordinate::new(0.0, 180.0)));
        assert!(rect.contains(&GeoCoordinate::new(5.0, -180.0)));
        assert!(rect.contains(&GeoCoordinate::new(-5.0, 175.0)));
        assert!(rect.contains(&GeoCoordinate::new(-5.0, -175.0)));
        assert!(!rect.contains(&GeoCoordinate::new(0.0, 0.0)));
        assert!(!rect.contains(&GeoCoordinate::new(0.0, 160.0)));
        assert!(!rect.contains(&GeoCoordinate::new(20.0, 180.0)));
    }

    #[test]
    fn pole_containment() {
        let rect = rect(90.0, 10.0, 80.0, 20.0);
        assert!(rect.contains(&GeoCoordinate::new(90.0, -150.0)));
        assert!(!rect.contains(&GeoCoordinate::new(85.0, -150.0)));
    }

    #[test]
    fn center_and_size() {
        let plain = rect(10.0, 0.0, -10.0, 20.0);
        assert_eq!(plain.center(), GeoCoordinate::new(0.0, 10.0));
        assert_eq!(plain.width(), 20.0);
        assert_eq!(plain.height(), 20.0);

        let wrapping = rect(10.0, 160.0, -10.0, -140.0);
        assert_eq!(wrapping.center(), GeoCoordinate::new(0.0, -170.0));
        assert_eq!(wrapping.width(), 60.0);

        assert!(GeoRectangle::default().width().is_nan());
        assert!(!GeoRectangle::default().center().is_valid());
    }

    #[test]
    fn from_center() {
        let rect = GeoRectangle::from_center(GeoCoordinate::new(0.0, 175.0), 20.0, 10.0);
        assert_eq!(rect.top_left(), GeoCoordinate::new(5.0, 165.0));
        assert_eq!(rect.bottom_right(), GeoCoordinate::new(-5.0, -175.0));
        assert_abs_diff_eq!(rect.center().longitude(), 175.0);

        let near_pole = GeoRectangle::from_center(GeoCoordinate::new(80.0, 0.0), 10.0, 40.0);
        assert_eq!(near_pole.top_left().latitude(), 90.0);
        assert_eq!(near_pole.bottom_right().latitude(), 70.0);
        assert_eq!(near_pole.center(), GeoCoordinate::new(80.0, 0.0));
    }

    #[test]
    fn set_width_and_height() {
        let mut rect = rect(10.0, 0.0, -10.0, 20.0);
        rect.set_width(400.0);
        assert!(rect.is_full_longitude());
        assert_eq!(rect.width(), 360.0);

        let mut rect = self::rect(10.0, 0.0, -10.0, 20.0);
        rect.set_width(-1.0);
        assert_eq!(rect.width(), 20.0);
        rect.set_height(250.0);
        assert_eq!(rect.top_left().latitude(), 90.0);
        assert_eq!(rect.bottom_right().latitude(), -90.0);
    }

    #[test]
    fn set_center_clamps_at_pole() {
        let mut rect = rect(10.0, 0.0, -10.0, 20.0);
        rect.set_center(GeoCoordinate::new(85.0, 100.0));

        assert_eq!(rect.top_left(), GeoCoordinate::new(90.0, 90.0));
        assert_eq!(rect.bottom_right(), GeoCoordinate::new(80.0, 110.0));
    }

    #[test]
    fn corners() {
        let mut rect = rect(10.0, 0.0, -10.0, 20.0);
        assert_eq!(rect.top_right(), GeoCoordinate::new(10.0, 20.0));
        assert_eq!(rect.bottom_left(), GeoCoordinate::new(-10.0, 0.0));

        rect.set_top_right(GeoCoordinate::new(15.0, 25.0));
        rect.set_bottom_left(GeoCoordinate::new(-15.0, -5.0));
        assert_eq!(rect.top_left(), GeoCoordinate::new(15.0, -5.0));
        assert_eq!(rect.bottom_right(), GeoCoordinate::new(-15.0, 25.0));
    }

    #[test]
    fn intersects() {
        let a = rect(10.0, 0.0, 0.0, 10.0);
        assert!(a.intersects(&rect(5.0, 5.0, -5.0, 15.0)));
        assert!(!a.intersects(&rect(5.0, 20.0, -5.0, 30.0)));
        assert!(!a.intersects(&rect(-5.0, 0.0, -10.0, 10.0)));

        let wrapping = rect(10.0, 170.0, 0.0, -170.0);
        assert!(wrapping.intersects(&rect(5.0, 175.0, 0.0, 179.0)));
        assert!(!wrapping.intersects(&a));
        assert!(wrapping.intersects(&rect(5.0, 160.0, 0.0, -160.0)));

        assert!(rect(90.0, 0.0, 80.0, 10.0).intersects(&rect(90.0, 100.0, 85.0, 110.0)));
    }

    #[test]
    fn contains_rectangle() {
        let outer = rect(10.0, 170.0, -10.0, -170.0);
        assert!(outer.contains_rectangle(&rect(5.0, 175.0, -5.0, -175.0)));
        assert!(!outer.contains_rectangle(&rect(5.0, 160.0, -5.0, -175.0)));
    }

    #[test]
    fn translate() {
        let moved = rect(10.0, 170.0, 0.0, 175.0).translated(85.0, 20.0);
        assert_eq!(moved.top_left(), GeoCoordinate::new(90.0, -170.0));
        assert_eq!(moved.bottom_right(), GeoCoordinate::new(85.0, -165.0));

        let full = rect(10.0, -180.0, 0.0, 180.0).translated(0.0, 30.0);
        assert!(full.is_full_longitude());

        let original = rect(10.0, 170.0, 0.0, 175.0);
        assert_eq!(original.translated(f64::NAN, 0.0), original);
        assert_eq!(original.translated(0.0, f64::NAN), original);
        assert_eq!(original.translated(f64::INFINITY, 0.0), original);
    }

    #[test]
    fn united() {
        let a = rect(10.0, 0.0, 0.0, 10.0);
        let b = rect(20.0, 5.0, 5.0, 30.0);
        assert_eq!(a.united(&b), rect(20.0, 0.0, 0.0, 30.0));

        let wrapping = rect(10.0, 170.0, 0.0, -170.0);
        assert_eq!(wrapping | a, rect(10.0, 0.0, 0.0, -170.0));

        let mut full = rect(10.0, -180.0, 0.0, 180.0);
        full |= a;
        assert!(full.is_full_longitude());
    }

    #[test]
    fn extend_shape() {
        let mut rect = rect(10.0, 170.0, 0.0, 175.0);
        rect.extend_shape(&GeoCoordinate::new(20.0, -175.0));
        assert_eq!(rect.top_left(), GeoCoordinate::new(20.0, 170.0));
        assert_eq!(rect.bottom_right(), GeoCoordinate::new(0.0, -175.0));

        rect.extend_shape(&GeoCoordinate::new(5.0, 100.0));
        assert_eq!(rect.top_left().longitude(), 100.0);

        let mut plain = self::rect(10.0, 0.0, 0.0, 10.0);
        plain.extend_shape(&GeoCoordinate::new(5.0, -20.0));
        assert_eq!(plain.top_left().longitude(), -20.0);
        plain.extend_shape(&GeoCoordinate::default());
        assert_eq!(plain.top_left().longitude(), -20.0);
    }

    #[test]
    fn from_coordinates() {
        let rect = GeoRectangle::from_coordinates(&[
            GeoCoordinate::new(0.0, 179.0),
            GeoCoordinate::new(5.0, -179.0),
            GeoCoordinate::new(-5.0, 178.0),
        ]);

        assert_eq!(rect.top_left(), GeoCoordinate::new(5.0, 178.0));
        assert_eq!(rect.bottom_right(), GeoCoordinate::new(-5.0, -179.0));
        assert!(!GeoRectangle::from_coordinates(&[]).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(
            rect(1.0, 2.0, 0.0, 3.0).to_string(),
            "GeoRectangle({1, 2}, {0, 3})"
        );
    }
}
