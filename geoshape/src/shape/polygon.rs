use std::cell::RefCell;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBoxPolicy;
use crate::cartesian::ClipperPath;
use crate::coordinate::GeoCoordinate;
use crate::shape::path::{fmt_coordinates, translate_coordinates, wrapped_mercator, PathCore};
use crate::shape::{GeoCircle, GeoRectangle, GeoShape, Shape, ShapeType, DEFAULT_CIRCLE_STEPS};

/// Polygon on the surface of the Earth: a closed perimeter connected by rhumb lines, with optional holes.
///
/// The perimeter is implicitly closed, the last coordinate must not repeat the first one. A coordinate is inside the
/// polygon if it is inside the perimeter and not inside any of the holes. Holes are not checked to be inside the
/// perimeter or to not intersect each other.
///
/// Containment is tested in the Mercator plane. The projected perimeter (clipper path) is cached together with the
/// bounding box, according to the [`BoundingBoxPolicy`] of the polygon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PolygonRepr", into = "PolygonRepr")]
pub struct GeoPolygon {
    core: PathCore,
    holes: Vec<Vec<GeoCoordinate>>,
    clipper: RefCell<Option<ClipperPath>>,
}

impl GeoPolygon {
    /// Creates a polygon without holes. If any of the coordinates is invalid, an empty polygon is created.
    pub fn new(perimeter: Vec<GeoCoordinate>) -> Self {
        Self {
            core: PathCore::new(perimeter, BoundingBoxPolicy::Lazy),
            holes: vec![],
            clipper: RefCell::default(),
        }
    }

    /// Sets the policy of bounding box computation.
    pub fn with_policy(mut self, policy: BoundingBoxPolicy) -> Self {
        self.set_policy(policy);
        self
    }

    /// Approximates a circle with a polygon of `steps` vertices (at least 3).
    ///
    /// Returns an empty polygon if the circle is invalid.
    pub fn from_circle(circle: &GeoCircle, steps: usize) -> Self {
        if !circle.is_valid() {
            log::debug!("Cannot convert invalid circle {circle} into a polygon");
            return Self::default();
        }

        Self::new(circle.peripheral_points(steps))
    }

    /// Creates a polygon with the corners of the rectangle as vertices, clockwise from the top left one.
    ///
    /// Returns an empty polygon if the rectangle is invalid.
    pub fn from_rectangle(rectangle: &GeoRectangle) -> Self {
        if !rectangle.is_valid() {
            log::debug!("Cannot convert invalid rectangle {rectangle} into a polygon");
            return Self::default();
        }

        Self::new(vec![
            rectangle.top_left(),
            rectangle.top_right(),
            rectangle.bottom_right(),
            rectangle.bottom_left(),
        ])
    }

    /// Creates a polygon from a generic shape.
    ///
    /// Circles are approximated with [`DEFAULT_CIRCLE_STEPS`] vertices. Paths and invalid shapes result in an empty
    /// polygon.
    pub fn from_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Polygon(polygon) => polygon.clone(),
            Shape::Circle(circle) => Self::from_circle(circle, DEFAULT_CIRCLE_STEPS),
            Shape::Rectangle(rectangle) => Self::from_rectangle(rectangle),
            Shape::Path(_) => {
                log::debug!("Cannot convert a path into a polygon");
                Self::default()
            }
        }
    }

    /// Coordinates of the perimeter.
    pub fn perimeter(&self) -> &[GeoCoordinate] {
        self.core.path()
    }

    /// Replaces the perimeter. Nothing is changed if any of the coordinates is invalid.
    pub fn set_perimeter(&mut self, perimeter: Vec<GeoCoordinate>) {
        if self.core.set_path(perimeter) {
            self.perimeter_changed();
        }
    }

    /// Policy of bounding box computation.
    pub fn policy(&self) -> BoundingBoxPolicy {
        self.core.policy()
    }

    /// Changes the policy of bounding box computation. Switching to eager policy computes the bounding box and the
    /// clipper path at once.
    pub fn set_policy(&mut self, policy: BoundingBoxPolicy) {
        self.core.set_policy(policy);
        self.perimeter_changed();
    }

    /// Number of perimeter coordinates.
    pub fn size(&self) -> usize {
        self.core.path().len()
    }

    /// Perimeter coordinate at the given index, or an invalid coordinate if the index is out of range.
    pub fn coordinate_at(&self, index: usize) -> GeoCoordinate {
        self.core.path().get(index).copied().unwrap_or_default()
    }

    /// Returns true if the perimeter has a vertex equal to `coordinate`.
    pub fn contains_coordinate(&self, coordinate: &GeoCoordinate) -> bool {
        self.core.path().contains(coordinate)
    }

    /// Appends a coordinate to the perimeter. Invalid coordinates are ignored.
    pub fn add_coordinate(&mut self, coordinate: GeoCoordinate) {
        if self.core.add_coordinate(coordinate) {
            self.perimeter_changed();
        }
    }

    /// Inserts a perimeter coordinate at `index`. Invalid coordinates and indices greater than
    /// [`GeoPolygon::size`] are ignored.
    pub fn insert_coordinate(&mut self, index: usize, coordinate: GeoCoordinate) {
        if self.core.insert_coordinate(index, coordinate) {
            self.perimeter_changed();
        }
    }

    /// Replaces the perimeter coordinate at `index`. Invalid coordinates and out of range indices are ignored.
    pub fn replace_coordinate(&mut self, index: usize, coordinate: GeoCoordinate) {
        if self.core.replace_coordinate(index, coordinate) {
            self.perimeter_changed();
        }
    }

    /// Removes the last occurrence of `coordinate` from the perimeter.
    pub fn remove_coordinate(&mut self, coordinate: &GeoCoordinate) {
        if self.core.remove_coordinate(coordinate) {
            self.perimeter_changed();
        }
    }

    /// Removes the perimeter coordinate at `index`. Out of range indices are ignored.
    pub fn remove_coordinate_at(&mut self, index: usize) {
        if self.core.remove_coordinate_at(index) {
            self.perimeter_changed();
        }
    }

    /// Length of the perimeter between the given indices in meters. See [`GeoPath::length`](crate::GeoPath::length).
    pub fn length(&self, from: usize, to: Option<usize>) -> f64 {
        self.core.length(from, to)
    }

    /// Adds a hole. Holes with invalid coordinates are ignored.
    pub fn add_hole(&mut self, hole: Vec<GeoCoordinate>) {
        if let Some(invalid) = hole.iter().find(|c| !c.is_valid()) {
            log::trace!("Rejected hole with invalid coordinate {invalid:?}");
            return;
        }

        self.holes.push(hole);
    }

    /// Removes the hole at `index`. Out of range indices are ignored.
    pub fn remove_hole(&mut self, index: usize) {
        if index >= self.holes.len() {
            log::trace!("Rejected removal of hole {index} out of {}", self.holes.len());
            return;
        }

        self.holes.remove(index);
    }

    /// Coordinates of the hole at `index`.
    pub fn hole_path(&self, index: usize) -> Option<&[GeoCoordinate]> {
        self.holes.get(index).map(Vec::as_slice)
    }

    /// Number of holes.
    pub fn holes_count(&self) -> usize {
        self.holes.len()
    }

    /// All holes of the polygon.
    pub fn holes(&self) -> &[Vec<GeoCoordinate>] {
        &self.holes
    }

    /// Moves the polygon with its holes by `d_lat` degrees northward and `d_lon` degrees eastward.
    ///
    /// The latitude offset is reduced so that no perimeter coordinate goes past a pole.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        let Some(d_lat) = self.core.translate(d_lat, d_lon) else {
            return;
        };

        for hole in &mut self.holes {
            translate_coordinates(hole, d_lat, d_lon);
        }

        self.perimeter_changed();
    }

    /// Returns a copy of the polygon moved by `d_lat` degrees northward and `d_lon` degrees eastward.
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = self.clone();
        result.translate(d_lat, d_lon);
        result
    }

    fn perimeter_changed(&mut self) {
        let clipper = match self.core.policy() {
            BoundingBoxPolicy::Lazy => None,
            BoundingBoxPolicy::Eager => Some(self.build_clipper()),
        };

        *self.clipper.get_mut() = clipper;
    }

    fn build_clipper(&self) -> ClipperPath {
        let left_bound = self.core.bounds().left_bound_wrapped();
        self.core
            .path()
            .iter()
            .map(|c| wrapped_mercator(c, left_bound))
            .collect()
    }

    fn perimeter_contains(&self, coordinate: &GeoCoordinate) -> bool {
        if self.clipper.borrow().is_none() {
            let clipper = self.build_clipper();
            *self.clipper.borrow_mut() = Some(clipper);
        }

        let point = wrapped_mercator(coordinate, self.core.bounds().left_bound_wrapped());
        self.clipper
            .borrow()
            .as_ref()
            .is_some_and(|clipper| clipper.contains_point(&point))
    }
}

impl GeoShape for GeoPolygon {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Polygon
    }

    fn is_valid(&self) -> bool {
        self.core.path().len() > 2
    }

    fn is_empty(&self) -> bool {
        self.core.path().is_empty()
    }

    fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        if !coordinate.is_valid() || !self.perimeter_contains(coordinate) {
            return false;
        }

        !self
            .holes
            .iter()
            .any(|hole| GeoPolygon::new(hole.clone()).contains(coordinate))
    }

    fn center(&self) -> GeoCoordinate {
        self.bounding_geo_rectangle().center()
    }

    fn bounding_geo_rectangle(&self) -> GeoRectangle {
        self.core.bounds().rect()
    }

    fn extend_shape(&mut self, coordinate: &GeoCoordinate) {
        if self.contains(coordinate) {
            return;
        }

        self.add_coordinate(*coordinate);
    }
}

impl PartialEq for GeoPolygon {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.holes == other.holes
    }
}

impl Display for GeoPolygon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeoPolygon(")?;
        fmt_coordinates(f, self.perimeter())?;
        write!(f, ")")
    }
}

impl From<Vec<GeoCoordinate>> for GeoPolygon {
    fn from(value: Vec<GeoCoordinate>) -> Self {
        Self::new(value)
    }
}

#[derive(Serialize, Deserialize)]
struct PolygonRepr {
    perimeter: Vec<GeoCoordinate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    holes: Vec<Vec<GeoCoordinate>>,
    #[serde(default)]
    policy: BoundingBoxPolicy,
}

impl From<PolygonRepr> for GeoPolygon {
    fn from(value: PolygonRepr) -> Self {
        let mut polygon = Self::new(value.perimeter).with_policy(value.policy);
        for hole in value.holes {
            polygon.add_hole(hole);
        }

        polygon
    }
}

impl From<GeoPolygon> for PolygonRepr {
    fn from(value: GeoPolygon) -> Self {
        Self {
            policy: value.policy(),
            perimeter: value.core.path().to_vec(),
            holes: value.holes,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::shape::GeoPath;

    fn coords(points: &[(f64, f64)]) -> Vec<GeoCoordinate> {
        points
            .iter()
            .map(|&(lat, lon)| GeoCoordinate::new(lat, lon))
            .collect()
    }

    fn square_with_hole(policy: BoundingBoxPolicy) -> GeoPolygon {
        let mut polygon = GeoPolygon::new(coords(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
        ]))
        .with_policy(policy);
        polygon.add_hole(coords(&[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)]));
        polygon
    }

    #[test]
    fn validity() {
        let mut polygon = GeoPolygon::default();
        assert!(!polygon.is_valid());
        assert!(polygon.is_empty());

        polygon.add_coordinate(GeoCoordinate::new(0.0, 0.0));
        polygon.add_coordinate(GeoCoordinate::new(1.0, 0.0));
        assert!(!polygon.is_valid());
        assert!(!polygon.is_empty());

        polygon.add_coordinate(GeoCoordinate::new(1.0, 1.0));
        assert!(polygon.is_valid());
    }

    #[test]
    fn hole_subtraction() {
        for policy in [BoundingBoxPolicy::Lazy, BoundingBoxPolicy::Eager] {
            let polygon = square_with_hole(policy);

            assert!(!polygon.contains(&GeoCoordinate::new(5.0, 5.0)));
            assert!(polygon.contains(&GeoCoordinate::new(1.0, 1.0)));
            assert!(polygon.contains(&GeoCoordinate::new(8.0, 5.0)));
            assert!(!polygon.contains(&GeoCoordinate::new(11.0, 5.0)));
            assert!(!polygon.contains(&GeoCoordinate::default()));
        }
    }

    #[test]
    fn contains_across_antimeridian() {
        let polygon = GeoPolygon::new(coords(&[
            (10.0, 170.0),
            (10.0, -170.0),
            (-10.0, -170.0),
            (-10.0, 170.0),
        ]));

        assert_abs_diff_eq!(polygon.bounding_geo_rectangle().width(), 20.0);
        assert!(polygon.contains(&GeoCoordinate::new(0.0, 180.0)));
        assert!(polygon.contains(&GeoCoordinate::new(0.0, -180.0)));
        assert!(polygon.contains(&GeoCoordinate::new(5.0, 175.0)));
        assert!(polygon.contains(&GeoCoordinate::new(-5.0, -175.0)));
        assert!(!polygon.contains(&GeoCoordinate::new(0.0, 0.0)));
        assert!(!polygon.contains(&GeoCoordinate::new(0.0, 160.0)));
    }

    #[test]
    fn clipper_path_follows_mutations() {
        for policy in [BoundingBoxPolicy::Lazy, BoundingBoxPolicy::Eager] {
            let mut polygon = GeoPolygon::new(coords(&[
                (0.0, 0.0),
                (0.0, 10.0),
                (10.0, 10.0),
                (10.0, 0.0),
            ]))
            .with_policy(policy);
            let point = GeoCoordinate::new(5.0, 15.0);
            assert!(!polygon.contains(&point));

            polygon.replace_coordinate(1, GeoCoordinate::new(0.0, 20.0));
            polygon.replace_coordinate(2, GeoCoordinate::new(10.0, 20.0));
            assert!(polygon.contains(&point));

            polygon.remove_coordinate_at(3);
            polygon.remove_coordinate(&GeoCoordinate::new(0.0, 0.0));
            assert!(!polygon.is_valid());
            assert!(!polygon.contains(&point));
        }
    }

    #[test]
    fn holes() {
        let mut polygon = square_with_hole(BoundingBoxPolicy::Lazy);
        polygon.add_hole(vec![GeoCoordinate::new(1.0, 1.0), GeoCoordinate::default()]);
        assert_eq!(polygon.holes_count(), 1);

        polygon.add_hole(coords(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0)]));
        assert_eq!(polygon.holes_count(), 2);
        assert_eq!(polygon.hole_path(1), Some(&coords(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0)])[..]));
        assert_eq!(polygon.hole_path(2), None);

        polygon.remove_hole(5);
        assert_eq!(polygon.holes_count(), 2);
        polygon.remove_hole(0);
        assert_eq!(polygon.holes_count(), 1);
        assert!(polygon.contains(&GeoCoordinate::new(5.0, 5.0)));
        assert_eq!(polygon.holes()[0].len(), 3);
    }

    #[test]
    fn translate_moves_holes() {
        let mut polygon = square_with_hole(BoundingBoxPolicy::Lazy);
        polygon.translate(85.0, 0.0);

        assert_eq!(polygon.coordinate_at(2), GeoCoordinate::new(90.0, 10.0));
        assert_eq!(polygon.coordinate_at(0), GeoCoordinate::new(80.0, 0.0));
        assert_eq!(polygon.hole_path(0).map(|h| h[0]), Some(GeoCoordinate::new(84.0, 4.0)));
        assert!(!polygon.contains(&GeoCoordinate::new(85.0, 5.0)));
        assert!(polygon.contains(&GeoCoordinate::new(81.0, 1.0)));

        let moved = square_with_hole(BoundingBoxPolicy::Eager).translated(0.0, 175.0);
        assert!(moved.contains(&GeoCoordinate::new(1.0, -178.0)));
        assert!(!moved.contains(&GeoCoordinate::new(5.0, -180.0)));
        assert!(!moved.contains(&GeoCoordinate::new(1.0, 1.0)));
    }

    #[test]
    fn translate_by_non_finite_offset_is_ignored() {
        for policy in [BoundingBoxPolicy::Lazy, BoundingBoxPolicy::Eager] {
            let mut polygon = square_with_hole(policy);
            let original = polygon.clone();

            polygon.translate(f64::NAN, 0.0);
            polygon.translate(0.0, f64::NAN);
            polygon.translate(f64::NEG_INFINITY, 0.0);

            assert_eq!(polygon, original);
            assert!(polygon.contains(&GeoCoordinate::new(1.0, 1.0)));
            assert!(!polygon.contains(&GeoCoordinate::new(5.0, 5.0)));
        }
    }

    #[test]
    fn from_circle() {
        let center = GeoCoordinate::new(0.0, 0.0);
        let radius = 1_000_000.0;
        let polygon =
            GeoPolygon::from_circle(&GeoCircle::new(center, radius), DEFAULT_CIRCLE_STEPS);

        assert_eq!(polygon.size(), 128);
        for vertex in polygon.perimeter() {
            let distance = center.distance_to(vertex);
            assert!((distance - radius).abs() <= radius * 1e-3);
        }

        assert!(polygon.contains(&center));
        assert!(!polygon.contains(&GeoCoordinate::new(0.0, 10.0)));
        assert!(GeoPolygon::from_circle(&GeoCircle::default(), 16).is_empty());
    }

    #[test]
    fn from_rectangle() {
        let rectangle = GeoRectangle::new(
            GeoCoordinate::new(10.0, 170.0),
            GeoCoordinate::new(0.0, -170.0),
        );
        let polygon = GeoPolygon::from_rectangle(&rectangle);

        assert_eq!(
            polygon.perimeter(),
            &coords(&[(10.0, 170.0), (10.0, -170.0), (0.0, -170.0), (0.0, 170.0)])[..]
        );
        assert_eq!(polygon.bounding_geo_rectangle(), rectangle);
        assert!(polygon.contains(&GeoCoordinate::new(5.0, 180.0)));
        assert!(GeoPolygon::from_rectangle(&GeoRectangle::default()).is_empty());
    }

    #[test]
    fn from_shape() {
        let polygon = square_with_hole(BoundingBoxPolicy::Lazy);
        assert_eq!(GeoPolygon::from_shape(&Shape::from(polygon.clone())), polygon);

        let circle = GeoCircle::new(GeoCoordinate::new(0.0, 0.0), 1000.0);
        assert_eq!(GeoPolygon::from_shape(&Shape::from(circle)).size(), DEFAULT_CIRCLE_STEPS);

        let path = GeoPath::new(coords(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
        assert!(GeoPolygon::from_shape(&Shape::from(path)).is_empty());
    }

    #[test]
    fn equality() {
        let a = square_with_hole(BoundingBoxPolicy::Lazy);
        let b = square_with_hole(BoundingBoxPolicy::Eager);
        assert_eq!(a, b);

        let mut c = b.clone();
        c.remove_hole(0);
        assert_ne!(a, c);
    }

    #[test]
    fn extend_shape() {
        let mut polygon = GeoPolygon::new(coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]));
        polygon.extend_shape(&GeoCoordinate::new(1.0, 5.0));
        assert_eq!(polygon.size(), 3);

        polygon.extend_shape(&GeoCoordinate::new(10.0, 0.0));
        assert_eq!(polygon.size(), 4);
        assert!(polygon.contains(&GeoCoordinate::new(8.0, 2.0)));
    }

    #[test]
    fn perimeter_length() {
        let polygon = GeoPolygon::new(coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]));
        let open = polygon.length(0, Some(3));
        let closed = polygon.length(0, None);

        assert!(closed > open);
        assert_abs_diff_eq!(
            closed - open,
            GeoCoordinate::new(1.0, 0.0).distance_to(&GeoCoordinate::new(0.0, 0.0)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn display() {
        let polygon = GeoPolygon::new(coords(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]));
        assert_eq!(polygon.to_string(), "GeoPolygon([ {1, 2}, {3, 4}, {5, 6} ])");
    }

    #[test]
    fn serialization() {
        let polygon = square_with_hole(BoundingBoxPolicy::Eager);
        let json = serde_json::to_string(&polygon).expect("serializable");
        let restored: GeoPolygon = serde_json::from_str(&json).expect("deserializable");

        assert_eq!(restored, polygon);
        assert_eq!(restored.policy(), BoundingBoxPolicy::Eager);
        assert!(!restored.contains(&GeoCoordinate::new(5.0, 5.0)));
    }
}
