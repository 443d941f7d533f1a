use ::geo_types::{coord, Coord, LineString, Point, Polygon};

use crate::coordinate::GeoCoordinate;
use crate::projection::{GeoPoint, NewGeoPoint};
use crate::shape::{GeoPath, GeoPolygon, GeoRectangle};

impl GeoPoint for Coord<f64> {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.y
    }

    fn lon(&self) -> f64 {
        self.x
    }
}

impl NewGeoPoint<f64> for Coord<f64> {
    fn latlon(lat: f64, lon: f64) -> Self {
        coord!(x: lon, y: lat)
    }
}

impl GeoPoint for Point<f64> {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.y()
    }

    fn lon(&self) -> f64 {
        self.x()
    }
}

impl NewGeoPoint<f64> for Point<f64> {
    fn latlon(lat: f64, lon: f64) -> Self {
        Point::new(lon, lat)
    }
}

impl From<Coord<f64>> for GeoCoordinate {
    fn from(value: Coord<f64>) -> Self {
        GeoCoordinate::new(value.lat(), value.lon())
    }
}

impl From<GeoCoordinate> for Coord<f64> {
    fn from(value: GeoCoordinate) -> Self {
        Coord::latlon(value.latitude(), value.longitude())
    }
}

fn ring(coordinates: &[GeoCoordinate]) -> LineString<f64> {
    // `Polygon::new` closes the rings.
    LineString::new(coordinates.iter().map(|&c| Coord::from(c)).collect())
}

impl From<&GeoPath> for LineString<f64> {
    fn from(value: &GeoPath) -> Self {
        ring(value.path())
    }
}

impl From<&GeoPolygon> for Polygon<f64> {
    fn from(value: &GeoPolygon) -> Self {
        Polygon::new(
            ring(value.perimeter()),
            value.holes().iter().map(|hole| ring(hole)).collect(),
        )
    }
}

impl From<&GeoRectangle> for Polygon<f64> {
    fn from(value: &GeoRectangle) -> Self {
        Polygon::from(&GeoPolygon::from_rectangle(value))
    }
}
