//! Projections between geographic coordinates and planar spaces.

mod web_mercator;

pub use web_mercator::{coord_to_mercator, coordinate_interpolation, mercator_to_coord, WebMercator};

use num_traits::Float;

use crate::coordinate::GeoCoordinate;

/// Projection converts points from one coordinate system to another.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Projects a point from the input coordinate system into the output one. Returns `None` if the point cannot be
    /// projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Projects a point back from the output coordinate system into the input one.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// A point on the surface of a celestial body given by latitude and longitude in degrees.
pub trait GeoPoint {
    /// Numeric type used for the coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// Geographic point that can be constructed from latitude and longitude.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

impl GeoPoint for GeoCoordinate {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.latitude()
    }

    fn lon(&self) -> f64 {
        self.longitude()
    }
}

impl NewGeoPoint<f64> for GeoCoordinate {
    fn latlon(lat: f64, lon: f64) -> Self {
        GeoCoordinate::new(lat, lon)
    }
}
