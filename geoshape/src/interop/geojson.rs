use ::geojson::{Geometry, LineStringType, PolygonType, Position, Value};

use crate::coordinate::GeoCoordinate;
use crate::error::GeoShapeError;
use crate::projection::{GeoPoint, NewGeoPoint};
use crate::shape::{GeoPath, GeoPolygon, GeoShape, Shape, DEFAULT_CIRCLE_STEPS};

/// GeoJSON position as a geographic point: `[lon, lat]` or `[lon, lat, alt]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPoint(Position);

impl TryFrom<Position> for GeoJsonPoint {
    type Error = GeoShapeError;

    fn try_from(value: Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(GeoShapeError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else {
            Ok(GeoJsonPoint(value))
        }
    }
}

impl GeoPoint for GeoJsonPoint {
    type Num = f64;

    fn lat(&self) -> Self::Num {
        self.0[1]
    }

    fn lon(&self) -> Self::Num {
        self.0[0]
    }
}

impl NewGeoPoint for GeoJsonPoint {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self(vec![lon, lat])
    }
}

impl From<&GeoJsonPoint> for GeoCoordinate {
    fn from(value: &GeoJsonPoint) -> Self {
        match value.0.get(2) {
            Some(&alt) => GeoCoordinate::with_altitude(value.lat(), value.lon(), alt),
            None => GeoCoordinate::new(value.lat(), value.lon()),
        }
    }
}

impl From<GeoCoordinate> for GeoJsonPoint {
    fn from(value: GeoCoordinate) -> Self {
        let mut point = GeoJsonPoint::latlon(value.latitude(), value.longitude());
        if let Some(alt) = value.altitude() {
            point.0.push(alt);
        }

        point
    }
}

fn to_position(coordinate: &GeoCoordinate) -> Position {
    GeoJsonPoint::from(*coordinate).0
}

fn to_ring(coordinates: &[GeoCoordinate]) -> LineStringType {
    let mut ring: LineStringType = coordinates.iter().map(to_position).collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }

    ring
}

fn polygon_value(polygon: &GeoPolygon) -> Value {
    let mut rings = vec![to_ring(polygon.perimeter())];
    rings.extend(polygon.holes().iter().map(|hole| to_ring(hole)));
    Value::Polygon(rings)
}

impl From<&Shape> for Geometry {
    fn from(value: &Shape) -> Self {
        let value = match value {
            Shape::Path(path) => Value::LineString(path.path().iter().map(to_position).collect()),
            Shape::Polygon(polygon) => polygon_value(polygon),
            Shape::Rectangle(rectangle) => polygon_value(&GeoPolygon::from_rectangle(rectangle)),
            Shape::Circle(circle) => {
                polygon_value(&GeoPolygon::from_circle(circle, DEFAULT_CIRCLE_STEPS))
            }
        };

        Geometry::new(value)
    }
}

fn convert_coordinates(positions: &[Position]) -> Result<Vec<GeoCoordinate>, GeoShapeError> {
    positions
        .iter()
        .map(|position| {
            let coordinate = GeoCoordinate::from(&GeoJsonPoint::try_from(position.clone())?);
            if coordinate.is_valid() {
                Ok(coordinate)
            } else {
                Err(GeoShapeError::Conversion(format!(
                    "coordinate out of range: {coordinate}"
                )))
            }
        })
        .collect()
}

fn convert_ring(ring: &LineStringType) -> Result<Vec<GeoCoordinate>, GeoShapeError> {
    let mut coordinates = convert_coordinates(ring)?;
    if coordinates.len() > 1 && coordinates.first() == coordinates.last() {
        coordinates.pop();
    }

    Ok(coordinates)
}

fn convert_polygon(polygon: &PolygonType) -> Result<GeoPolygon, GeoShapeError> {
    let Some((exterior, interiors)) = polygon.split_first() else {
        return Err(GeoShapeError::Conversion(
            "polygon must have an exterior ring".to_string(),
        ));
    };

    let mut result = GeoPolygon::new(convert_ring(exterior)?);
    for interior in interiors {
        result.add_hole(convert_ring(interior)?);
    }

    Ok(result)
}

impl TryFrom<&Geometry> for Shape {
    type Error = GeoShapeError;

    fn try_from(value: &Geometry) -> Result<Self, Self::Error> {
        match &value.value {
            Value::LineString(line) => Ok(GeoPath::new(convert_coordinates(line)?).into()),
            Value::Polygon(polygon) => {
                let polygon = convert_polygon(polygon)?;
                if !polygon.is_valid() {
                    return Err(GeoShapeError::Conversion(
                        "polygon must have at least 3 distinct vertices".to_string(),
                    ));
                }

                Ok(polygon.into())
            }
            other => Err(GeoShapeError::Conversion(format!(
                "{} geometry cannot be represented as a shape",
                geometry_kind(other)
            ))),
        }
    }
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
