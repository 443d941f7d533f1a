//! Conversions between the shapes of this crate and other geometry crates.
//!
//! * `geo-types` feature (enabled by default): coordinates, paths, polygons and rectangles into `geo_types`
//!   geometries, and [`GeoPoint`](crate::projection::GeoPoint) for `geo_types` points.
//! * `geojson` feature: shapes to and from `geojson::Geometry`.

#[cfg(feature = "geo-types")]
mod geo_types;

#[cfg(feature = "geojson")]
mod geojson;

#[cfg(feature = "geojson")]
pub use self::geojson::GeoJsonPoint;
