//! Geographic shapes and the common interface they implement.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::coordinate::GeoCoordinate;
use crate::error::GeoShapeError;

mod circle;
mod path;
mod polygon;
mod rectangle;

pub use circle::{GeoCircle, DEFAULT_CIRCLE_STEPS, MIN_CIRCLE_STEPS};
pub use path::{GeoPath, MIN_LINE_RADIUS};
pub use polygon::GeoPolygon;
pub use rectangle::GeoRectangle;

/// Kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    /// [`GeoRectangle`].
    Rectangle,
    /// [`GeoCircle`].
    Circle,
    /// [`GeoPath`].
    Path,
    /// [`GeoPolygon`].
    Polygon,
}

/// Common interface of geographic shapes.
pub trait GeoShape {
    /// Kind of the shape.
    fn shape_type(&self) -> ShapeType;

    /// Returns true if the shape has enough data to describe a non-degenerate area or line.
    fn is_valid(&self) -> bool;

    /// Returns true if the shape has no defining coordinates or its area is zero.
    fn is_empty(&self) -> bool;

    /// Returns true if the coordinate is inside the shape. Invalid coordinates are never inside.
    fn contains(&self, coordinate: &GeoCoordinate) -> bool;

    /// Center of the shape. For paths and polygons this is the center of the bounding rectangle.
    fn center(&self) -> GeoCoordinate;

    /// Smallest rectangle containing the shape.
    fn bounding_geo_rectangle(&self) -> GeoRectangle;

    /// Grows the shape so that it contains the `coordinate`. Does nothing if the coordinate is invalid or already
    /// inside the shape.
    fn extend_shape(&mut self, coordinate: &GeoCoordinate);
}

/// Any of the geographic shapes.
///
/// Shapes of different kinds never compare equal, even if they are built from the same coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Rectangle.
    Rectangle(GeoRectangle),
    /// Circle.
    Circle(GeoCircle),
    /// Path.
    Path(GeoPath),
    /// Polygon.
    Polygon(GeoPolygon),
}

impl Shape {
    /// Moves the shape by `d_lat` degrees northward and `d_lon` degrees eastward.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        match self {
            Shape::Rectangle(v) => v.translate(d_lat, d_lon),
            Shape::Circle(v) => v.translate(d_lat, d_lon),
            Shape::Path(v) => v.translate(d_lat, d_lon),
            Shape::Polygon(v) => v.translate(d_lat, d_lon),
        }
    }

    /// Returns a copy of the shape moved by `d_lat` degrees northward and `d_lon` degrees eastward.
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = self.clone();
        result.translate(d_lat, d_lon);
        result
    }

    fn as_geo_shape(&self) -> &dyn GeoShape {
        match self {
            Shape::Rectangle(v) => v,
            Shape::Circle(v) => v,
            Shape::Path(v) => v,
            Shape::Polygon(v) => v,
        }
    }

    fn as_geo_shape_mut(&mut self) -> &mut dyn GeoShape {
        match self {
            Shape::Rectangle(v) => v,
            Shape::Circle(v) => v,
            Shape::Path(v) => v,
            Shape::Polygon(v) => v,
        }
    }
}

impl GeoShape for Shape {
    fn shape_type(&self) -> ShapeType {
        self.as_geo_shape().shape_type()
    }

    fn is_valid(&self) -> bool {
        self.as_geo_shape().is_valid()
    }

    fn is_empty(&self) -> bool {
        self.as_geo_shape().is_empty()
    }

    fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        self.as_geo_shape().contains(coordinate)
    }

    fn center(&self) -> GeoCoordinate {
        self.as_geo_shape().center()
    }

    fn bounding_geo_rectangle(&self) -> GeoRectangle {
        self.as_geo_shape().bounding_geo_rectangle()
    }

    fn extend_shape(&mut self, coordinate: &GeoCoordinate) {
        self.as_geo_shape_mut().extend_shape(coordinate)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Rectangle(v) => v.fmt(f),
            Shape::Circle(v) => v.fmt(f),
            Shape::Path(v) => v.fmt(f),
            Shape::Polygon(v) => v.fmt(f),
        }
    }
}

/// Returns true if both offsets of a translation are finite numbers.
pub(crate) fn is_valid_offset(d_lat: f64, d_lon: f64) -> bool {
    let valid = d_lat.is_finite() && d_lon.is_finite();
    if !valid {
        log::trace!("Rejected translation by ({d_lat}, {d_lon})");
    }

    valid
}

macro_rules! impl_shape_conversion {
    ($variant:ident, $type:ty) => {
        impl From<$type> for Shape {
            fn from(value: $type) -> Self {
                Shape::$variant(value)
            }
        }
    };
}

impl_shape_conversion!(Rectangle, GeoRectangle);
impl_shape_conversion!(Circle, GeoCircle);
impl_shape_conversion!(Path, GeoPath);
impl_shape_conversion!(Polygon, GeoPolygon);

fn conversion_error(from: ShapeType, to: ShapeType) -> GeoShapeError {
    GeoShapeError::Conversion(format!("{from:?} cannot be converted into {to:?}"))
}

impl TryFrom<Shape> for GeoRectangle {
    type Error = GeoShapeError;

    fn try_from(value: Shape) -> Result<Self, Self::Error> {
        match value {
            Shape::Rectangle(v) => Ok(v),
            other => Err(conversion_error(other.shape_type(), ShapeType::Rectangle)),
        }
    }
}

impl TryFrom<Shape> for GeoCircle {
    type Error = GeoShapeError;

    fn try_from(value: Shape) -> Result<Self, Self::Error> {
        match value {
            Shape::Circle(v) => Ok(v),
            other => Err(conversion_error(other.shape_type(), ShapeType::Circle)),
        }
    }
}

impl TryFrom<Shape> for GeoPath {
    type Error = GeoShapeError;

    fn try_from(value: Shape) -> Result<Self, Self::Error> {
        match value {
            Shape::Path(v) => Ok(v),
            other => Err(conversion_error(other.shape_type(), ShapeType::Path)),
        }
    }
}

impl TryFrom<Shape> for GeoPolygon {
    type Error = GeoShapeError;

    /// Polygons are returned as is. Valid circles and rectangles are converted into polygons, see
    /// [`GeoPolygon::from_shape`].
    fn try_from(value: Shape) -> Result<Self, Self::Error> {
        match value {
            Shape::Polygon(v) => Ok(v),
            Shape::Path(_) => Err(conversion_error(ShapeType::Path, ShapeType::Polygon)),
            other if !other.is_valid() => Err(GeoShapeError::InvalidShape(other.shape_type())),
            other => Ok(GeoPolygon::from_shape(&other)),
        }
    }
}
