//! Geographic shapes on the surface of the Earth: paths, polygons with holes, rectangles and circles.
//!
//! All shapes implement the [`GeoShape`] trait, which provides containment tests, bounding rectangles and shape
//! extension. Shapes correctly handle the antimeridian: a path going from longitude `179` to `-179` is 2 degrees
//! wide, not 358.
//!
//! ```
//! use geoshape::{GeoCoordinate, GeoPath, GeoPolygon, GeoShape};
//!
//! let path = GeoPath::new(vec![GeoCoordinate::new(0.0, 179.0), GeoCoordinate::new(1.0, -179.0)]);
//! assert_eq!(path.bounding_geo_rectangle().width(), 2.0);
//!
//! let mut polygon = GeoPolygon::new(vec![
//!     GeoCoordinate::new(0.0, 0.0),
//!     GeoCoordinate::new(0.0, 10.0),
//!     GeoCoordinate::new(10.0, 10.0),
//!     GeoCoordinate::new(10.0, 0.0),
//! ]);
//! polygon.add_hole(vec![
//!     GeoCoordinate::new(4.0, 4.0),
//!     GeoCoordinate::new(4.0, 6.0),
//!     GeoCoordinate::new(6.0, 6.0),
//!     GeoCoordinate::new(6.0, 4.0),
//! ]);
//! assert!(polygon.contains(&GeoCoordinate::new(1.0, 1.0)));
//! assert!(!polygon.contains(&GeoCoordinate::new(5.0, 5.0)));
//! ```
//!
//! # Invalid input
//!
//! Mutating methods never fail. Invalid coordinates, out of range indices and other bad input are ignored and the
//! shape stays unchanged. Use [`GeoShape::is_valid`] and [`GeoShape::is_empty`] to check the state of a shape. The
//! rejections are reported through the [`log`] crate at `trace` level.
//!
//! # Derived geometry
//!
//! Paths and polygons cache their bounding box (and polygons their projected perimeter). The cache is updated
//! according to the [`BoundingBoxPolicy`] of the shape. Queries update the cache through interior mutability, so the
//! shapes are `Send` but not `Sync`.

pub mod bounding_box;
pub mod cartesian;
pub mod coordinate;
mod error;
pub mod interop;
pub mod projection;
pub mod shape;

pub use bounding_box::{BoundingBoxAccumulator, BoundingBoxPolicy};
pub use coordinate::{GeoCoordinate, EARTH_MEAN_RADIUS};
pub use error::GeoShapeError;
pub use shape::{
    GeoCircle, GeoPath, GeoPolygon, GeoRectangle, GeoShape, Shape, ShapeType, DEFAULT_CIRCLE_STEPS,
    MIN_CIRCLE_STEPS, MIN_LINE_RADIUS,
};
