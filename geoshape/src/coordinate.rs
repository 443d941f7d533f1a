//! Geographic coordinate and the spherical primitives the shapes are built on.

use std::fmt::{Display, Formatter};

use approx::{AbsDiffEq, RelativeEq};
use geo::{HaversineBearing, HaversineDestination, HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// Mean radius of the Earth in meters. Same sphere as used by the haversine algorithms of the `geo` crate.
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// A point on the surface of the Earth: latitude and longitude in degrees with an optional altitude in meters.
///
/// The default value is an invalid coordinate (both latitude and longitude are `NaN`). Two invalid components
/// compare equal, so two default coordinates are equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoCoordinate {
    lat: f64,
    lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alt: Option<f64>,
}

impl Default for GeoCoordinate {
    fn default() -> Self {
        Self {
            lat: f64::NAN,
            lon: f64::NAN,
            alt: None,
        }
    }
}

impl GeoCoordinate {
    /// Creates a 2d coordinate.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            alt: None,
        }
    }

    /// Creates a coordinate with altitude.
    pub const fn with_altitude(lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            lat,
            lon,
            alt: Some(alt),
        }
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Altitude in meters, if set.
    pub fn altitude(&self) -> Option<f64> {
        self.alt
    }

    /// Sets latitude.
    pub fn set_latitude(&mut self, lat: f64) {
        self.lat = lat;
    }

    /// Sets longitude.
    pub fn set_longitude(&mut self, lon: f64) {
        self.lon = lon;
    }

    /// Sets or clears altitude.
    pub fn set_altitude(&mut self, alt: Option<f64>) {
        self.alt = alt;
    }

    /// A coordinate is valid if its latitude is in `[-90, 90]` and its longitude is in `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        is_valid_lat(self.lat) && is_valid_lon(self.lon)
    }

    /// Great circle distance to the `other` coordinate in meters. Returns `NaN` if any of the coordinates is
    /// invalid. Altitude is ignored.
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        if !self.is_valid() || !other.is_valid() {
            return f64::NAN;
        }

        self.to_point().haversine_distance(&other.to_point())
    }

    /// Initial bearing of the great circle from this coordinate to the `other` in degrees, in range `[0, 360)`.
    /// Returns `NaN` if any of the coordinates is invalid.
    pub fn azimuth_to(&self, other: &GeoCoordinate) -> f64 {
        if !self.is_valid() || !other.is_valid() {
            return f64::NAN;
        }

        let bearing = self.to_point().haversine_bearing(other.to_point());
        let azimuth = bearing.rem_euclid(360.0);
        if azimuth >= 360.0 {
            0.0
        } else {
            azimuth
        }
    }

    /// Coordinate reached by moving `distance` meters along the great circle starting at the given `azimuth`
    /// (degrees). `distance_up` is added to the altitude, if this coordinate has one.
    ///
    /// Returns an invalid coordinate if this coordinate is invalid.
    pub fn at_distance_and_azimuth(
        &self,
        distance: f64,
        azimuth: f64,
        distance_up: f64,
    ) -> GeoCoordinate {
        if !self.is_valid() {
            return GeoCoordinate::default();
        }

        let destination = self.to_point().haversine_destination(azimuth, distance);
        GeoCoordinate {
            lat: clip_lat(destination.y()),
            lon: wrap_lon(destination.x()),
            alt: self.alt.map(|alt| alt + distance_up),
        }
    }

    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Wraps longitude into the `[-180, 180]` range.
pub fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Clamps latitude into the `[-90, 90]` range.
pub fn clip_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

/// Returns true if `lat` is a valid latitude in degrees.
pub fn is_valid_lat(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// Returns true if `lon` is a valid longitude in degrees.
pub fn is_valid_lon(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

fn nan_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for GeoCoordinate {
    fn eq(&self, other: &Self) -> bool {
        let alt_eq = match (self.alt, other.alt) {
            (Some(a), Some(b)) => nan_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        nan_eq(self.lat, other.lat) && nan_eq(self.lon, other.lon) && alt_eq
    }
}

impl Display for GeoCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)?;
        if let Some(alt) = self.alt {
            write!(f, ", {alt}")?;
        }

        Ok(())
    }
}

impl AbsDiffEq for GeoCoordinate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let alt_eq = match (self.alt, other.alt) {
            (Some(a), Some(b)) => a.abs_diff_eq(&b, epsilon),
            (None, None) => true,
            _ => false,
        };

        self.lat.abs_diff_eq(&other.lat, epsilon)
            && self.lon.abs_diff_eq(&other.lon, epsilon)
            && alt_eq
    }
}

impl RelativeEq for GeoCoordinate {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        let alt_eq = match (self.alt, other.alt) {
            (Some(a), Some(b)) => a.relative_eq(&b, epsilon, max_relative),
            (None, None) => true,
            _ => false,
        };

        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lon.relative_eq(&other.lon, epsilon, max_relative)
            && alt_eq
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn validity() {
        assert!(GeoCoordinate::new(0.0, 0.0).is_valid());
        assert!(GeoCoordinate::new(90.0, -180.0).is_valid());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_valid());
        assert!(!GeoCoordinate::new(90.1, 0.0).is_valid());
        assert!(!GeoCoordinate::new(0.0, 180.5).is_valid());
        assert!(!GeoCoordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoCoordinate::default().is_valid());
    }

    #[test]
    fn equality() {
        assert_eq!(GeoCoordinate::default(), GeoCoordinate::default());
        assert_eq!(GeoCoordinate::new(1.0, 2.0), GeoCoordinate::new(1.0, 2.0));
        assert_ne!(GeoCoordinate::new(1.0, 2.0), GeoCoordinate::with_altitude(1.0, 2.0, 0.0));
        assert_ne!(GeoCoordinate::new(1.0, 2.0), GeoCoordinate::default());
    }

    #[test]
    fn distance() {
        let a = GeoCoordinate::new(0.0, 0.0);
        let b = GeoCoordinate::new(0.0, 1.0);
        let expected = EARTH_MEAN_RADIUS * 1f64.to_radians();

        assert_abs_diff_eq!(a.distance_to(&b), expected, epsilon = 1e-6);
        assert_abs_diff_eq!(a.distance_to(&a), 0.0);
        assert!(a.distance_to(&GeoCoordinate::default()).is_nan());

        let west = GeoCoordinate::new(0.0, 179.5);
        let east = GeoCoordinate::new(0.0, -179.5);
        assert_abs_diff_eq!(west.distance_to(&east), expected, epsilon = 1e-6);
    }

    #[test]
    fn azimuth() {
        let origin = GeoCoordinate::new(0.0, 0.0);

        assert_abs_diff_eq!(origin.azimuth_to(&GeoCoordinate::new(1.0, 0.0)), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(origin.azimuth_to(&GeoCoordinate::new(0.0, 1.0)), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            origin.azimuth_to(&GeoCoordinate::new(-1.0, 0.0)),
            180.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            origin.azimuth_to(&GeoCoordinate::new(0.0, -1.0)),
            270.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn at_distance_and_azimuth() {
        let origin = GeoCoordinate::with_altitude(10.0, 20.0, 100.0);
        let target = origin.at_distance_and_azimuth(500_000.0, 45.0, 10.0);

        assert_abs_diff_eq!(origin.distance_to(&target), 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(origin.azimuth_to(&target), 45.0, epsilon = 1e-6);
        assert_eq!(target.altitude(), Some(110.0));

        let across = GeoCoordinate::new(0.0, 179.9).at_distance_and_azimuth(100_000.0, 90.0, 0.0);
        assert!(across.is_valid());
        assert!(across.longitude() < 0.0);

        assert!(!GeoCoordinate::default()
            .at_distance_and_azimuth(1.0, 0.0, 0.0)
            .is_valid());
    }

    #[test]
    fn wrap_longitude() {
        assert_eq!(wrap_lon(180.0), 180.0);
        assert_eq!(wrap_lon(-180.0), -180.0);
        assert_abs_diff_eq!(wrap_lon(190.0), -170.0);
        assert_abs_diff_eq!(wrap_lon(-190.0), 170.0);
        assert_abs_diff_eq!(wrap_lon(725.0), 5.0);
        assert_eq!(clip_lat(95.0), 90.0);
        assert_eq!(clip_lat(-95.0), -90.0);
    }

    #[test]
    fn display() {
        assert_eq!(GeoCoordinate::new(1.5, -2.0).to_string(), "1.5, -2");
        assert_eq!(GeoCoordinate::with_altitude(1.0, 2.0, 3.0).to_string(), "1, 2, 3");
    }
}
