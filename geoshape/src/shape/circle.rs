use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::coordinate::{wrap_lon, GeoCoordinate, EARTH_MEAN_RADIUS};
use crate::shape::{is_valid_offset, GeoRectangle, GeoShape, ShapeType};

/// Smallest number of points a circle is approximated with.
pub const MIN_CIRCLE_STEPS: usize = 3;
/// Number of points used to approximate a circle when no explicit number is given.
pub const DEFAULT_CIRCLE_STEPS: usize = 128;

const RADIUS_TOLERANCE: f64 = 1e-7;

/// Circular area on the surface of the Earth: all points within `radius` meters (great circle distance) of the
/// `center`.
///
/// The bounding rectangle is recomputed every time the center or the radius change. A circle that covers a pole has
/// a bounding rectangle spanning all longitudes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CircleRepr", into = "CircleRepr")]
pub struct GeoCircle {
    center: GeoCoordinate,
    radius: f64,
    bbox: GeoRectangle,
    crosses_north: bool,
    crosses_south: bool,
}

impl Default for GeoCircle {
    fn default() -> Self {
        Self::new(GeoCoordinate::default(), -1.0)
    }
}

impl GeoCircle {
    /// Creates a new circle. `radius` is in meters.
    pub fn new(center: GeoCoordinate, radius: f64) -> Self {
        let mut circle = Self {
            center,
            radius,
            bbox: GeoRectangle::default(),
            crosses_north: false,
            crosses_south: false,
        };
        circle.update_bounding_box();
        circle
    }

    /// Radius in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sets the radius in meters.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.update_bounding_box();
    }

    /// Sets the center.
    pub fn set_center(&mut self, center: GeoCoordinate) {
        self.center = center;
        self.update_bounding_box();
    }

    /// Returns true if the north pole is inside the circle.
    pub fn crosses_north_pole(&self) -> bool {
        self.crosses_north
    }

    /// Returns true if the south pole is inside the circle.
    pub fn crosses_south_pole(&self) -> bool {
        self.crosses_south
    }

    /// Moves the center by `d_lat` degrees northward and `d_lon` degrees eastward.
    ///
    /// If the center goes over a pole, it continues down the opposite meridian.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        if !self.center.is_valid() {
            log::trace!("Cannot translate a circle with invalid center");
            return;
        }

        if !is_valid_offset(d_lat, d_lon) {
            return;
        }

        let mut lat = self.center.latitude() + d_lat;
        let mut lon = self.center.longitude() + d_lon;

        if lat > 90.0 {
            lat = 180.0 - lat;
            lon += 180.0;
        } else if lat < -90.0 {
            lat = -180.0 - lat;
            lon += 180.0;
        }

        self.center.set_latitude(lat);
        self.center.set_longitude(wrap_lon(lon));
        self.update_bounding_box();
    }

    /// Returns a copy of the circle moved by `d_lat` degrees northward and `d_lon` degrees eastward.
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = self.clone();
        result.translate(d_lat, d_lon);
        result
    }

    /// Approximates the circle border with `steps` points evenly spaced in azimuth, starting from north and going
    /// clockwise. `steps` smaller than [`MIN_CIRCLE_STEPS`] is raised to it.
    ///
    /// Every point is at great circle distance `radius` from the center and has the altitude of the center. Returns
    /// an empty vector for an invalid circle.
    pub fn peripheral_points(&self, steps: usize) -> Vec<GeoCoordinate> {
        if !self.is_valid() {
            return vec![];
        }

        let steps = steps.max(MIN_CIRCLE_STEPS);
        let ratio = self.radius / EARTH_MEAN_RADIUS;
        let (sin_ratio, cos_ratio) = ratio.sin_cos();
        let lat = self.center.latitude().to_radians();
        let lon = self.center.longitude().to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();

        (0..steps)
            .map(|i| {
                let azimuth = 2.0 * std::f64::consts::PI * i as f64 / steps as f64;
                let point_lat = (sin_lat * cos_ratio + cos_lat * sin_ratio * azimuth.cos()).asin();
                let point_lon = lon
                    + (azimuth.sin() * sin_ratio * cos_lat)
                        .atan2(cos_ratio - sin_lat * point_lat.sin());

                let mut point =
                    GeoCoordinate::new(point_lat.to_degrees(), wrap_lon(point_lon.to_degrees()));
                point.set_altitude(self.center.altitude());
                point
            })
            .collect()
    }

    /// Latitude of the border point in the given `azimuth` from the center.
    fn edge_latitude(&self, azimuth: f64) -> f64 {
        self.center
            .at_distance_and_azimuth(self.radius, azimuth, 0.0)
            .latitude()
    }

    fn update_bounding_box(&mut self) {
        self.crosses_north = self.crosses_pole(90.0);
        self.crosses_south = self.crosses_pole(-90.0);

        if self.is_empty() {
            self.bbox = if self.center.is_valid() {
                GeoRectangle::new(self.center, self.center)
            } else {
                GeoRectangle::default()
            };
            return;
        }

        self.bbox = match (self.crosses_north, self.crosses_south) {
            (true, true) => GeoRectangle::new(
                GeoCoordinate::new(90.0, -180.0),
                GeoCoordinate::new(-90.0, 180.0),
            ),
            (true, false) => {
                let south = self.edge_latitude(180.0);
                GeoRectangle::new(
                    GeoCoordinate::new(90.0, -180.0),
                    GeoCoordinate::new(south, 180.0),
                )
            }
            (false, true) => {
                let north = self.edge_latitude(0.0);
                GeoRectangle::new(
                    GeoCoordinate::new(north, -180.0),
                    GeoCoordinate::new(-90.0, 180.0),
                )
            }
            (false, false) => {
                let north = self.edge_latitude(0.0);
                let south = self.edge_latitude(180.0);

                let angular_radius = self.radius / EARTH_MEAN_RADIUS;
                let ratio = angular_radius.sin() / self.center.latitude().to_radians().cos();
                let d_lon = ratio.clamp(-1.0, 1.0).asin().to_degrees();

                GeoRectangle::new(
                    GeoCoordinate::new(north, wrap_lon(self.center.longitude() - d_lon)),
                    GeoCoordinate::new(south, wrap_lon(self.center.longitude() + d_lon)),
                )
            }
        };
    }

    fn crosses_pole(&self, pole_lat: f64) -> bool {
        if !self.is_valid() {
            return false;
        }

        let pole = GeoCoordinate::new(pole_lat, self.center.longitude());
        self.center.distance_to(&pole) < self.radius
    }
}

impl GeoShape for GeoCircle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Circle
    }

    fn is_valid(&self) -> bool {
        self.center.is_valid() && !self.radius.is_nan() && self.radius >= -RADIUS_TOLERANCE
    }

    fn is_empty(&self) -> bool {
        !self.is_valid() || self.radius <= RADIUS_TOLERANCE
    }

    fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        self.is_valid() && self.center.distance_to(coordinate) <= self.radius
    }

    fn center(&self) -> GeoCoordinate {
        self.center
    }

    fn bounding_geo_rectangle(&self) -> GeoRectangle {
        self.bbox
    }

    fn extend_shape(&mut self, coordinate: &GeoCoordinate) {
        if !self.is_valid() || !coordinate.is_valid() || self.contains(coordinate) {
            return;
        }

        self.radius = self.center.distance_to(coordinate);
        self.update_bounding_box();
    }
}

impl PartialEq for GeoCircle {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
            && (self.radius == other.radius || (self.radius.is_nan() && other.radius.is_nan()))
    }
}

impl Display for GeoCircle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeoCircle({{{}}}, {})", self.center, self.radius)
    }
}

#[derive(Serialize, Deserialize)]
struct CircleRepr {
    center: GeoCoordinate,
    radius: f64,
}

impl From<CircleRepr> for GeoCircle {
    fn from(value: CircleRepr) -> Self {
        Self::new(value.center, value.radius)
    }
}

impl From<GeoCircle> for CircleRepr {
    fn from(value: GeoCircle) -> Self {
        Self {
            center: value.center,
            radius: value.radius,
        }
    }
}
