use std::cell::{Ref, RefCell};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::bounding_box::{BoundingBoxAccumulator, BoundingBoxPolicy};
use crate::cartesian::{Segment, Vector2};
use crate::coordinate::{clip_lat, wrap_lon, GeoCoordinate};
use crate::projection::{coord_to_mercator, mercator_to_coord};
use crate::shape::{is_valid_offset, GeoRectangle, GeoShape, Shape, ShapeType};

/// Minimum distance in meters from a path line at which a coordinate is still considered to lie on the path.
pub const MIN_LINE_RADIUS: f64 = 0.2;

/// Derived geometry of a coordinate sequence.
#[derive(Debug, Clone, Default)]
pub(crate) struct BoundsCache {
    accumulator: BoundingBoxAccumulator,
    rect: GeoRectangle,
    left_bound_wrapped: f64,
    dirty: bool,
}

impl BoundsCache {
    fn recompute(&mut self, path: &[GeoCoordinate]) {
        let rect = self.accumulator.compute(path);
        self.set_rect(rect);
    }

    fn update(&mut self, path: &[GeoCoordinate]) {
        let rect = self.accumulator.update(path);
        self.set_rect(rect);
    }

    fn set_rect(&mut self, rect: GeoRectangle) {
        self.left_bound_wrapped = if rect.is_valid() {
            coord_to_mercator(&rect.top_left()).x()
        } else {
            0.0
        };
        self.rect = rect;
        self.dirty = false;
    }

    /// Mercator `x` of the west edge of the bounding rectangle.
    pub(crate) fn left_bound_wrapped(&self) -> f64 {
        self.left_bound_wrapped
    }

    pub(crate) fn rect(&self) -> GeoRectangle {
        self.rect
    }
}

/// Coordinate sequence with lazily or eagerly maintained bounding box. Shared by paths and polygon perimeters.
///
/// All mutators return `true` if the sequence was changed, and `false` if the input was rejected.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathCore {
    path: Vec<GeoCoordinate>,
    policy: BoundingBoxPolicy,
    cache: RefCell<BoundsCache>,
}

impl PathCore {
    pub(crate) fn new(path: Vec<GeoCoordinate>, policy: BoundingBoxPolicy) -> Self {
        let mut core = Self {
            path: vec![],
            policy,
            cache: RefCell::default(),
        };
        core.set_path(path);
        core
    }

    pub(crate) fn path(&self) -> &[GeoCoordinate] {
        &self.path
    }

    pub(crate) fn policy(&self) -> BoundingBoxPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: BoundingBoxPolicy) {
        self.policy = policy;
        if policy == BoundingBoxPolicy::Eager {
            self.cache.get_mut().recompute(&self.path);
        }
    }

    pub(crate) fn set_path(&mut self, path: Vec<GeoCoordinate>) -> bool {
        if let Some(invalid) = path.iter().find(|c| !c.is_valid()) {
            log::trace!("Rejected coordinate sequence with invalid coordinate {invalid:?}");
            return false;
        }

        self.path = path;
        self.changed(false);
        true
    }

    pub(crate) fn clear(&mut self) -> bool {
        self.path.clear();
        self.changed(false);
        true
    }

    pub(crate) fn add_coordinate(&mut self, coordinate: GeoCoordinate) -> bool {
        if !coordinate.is_valid() {
            log::trace!("Rejected invalid coordinate {coordinate:?}");
            return false;
        }

        self.path.push(coordinate);
        self.changed(true);
        true
    }

    pub(crate) fn insert_coordinate(&mut self, index: usize, coordinate: GeoCoordinate) -> bool {
        if index > self.path.len() || !coordinate.is_valid() {
            log::trace!("Rejected insertion of {coordinate:?} at index {index}");
            return false;
        }

        let appended = index == self.path.len();
        self.path.insert(index, coordinate);
        self.changed(appended);
        true
    }

    pub(crate) fn replace_coordinate(&mut self, index: usize, coordinate: GeoCoordinate) -> bool {
        if index >= self.path.len() || !coordinate.is_valid() {
            log::trace!("Rejected replacement of index {index} with {coordinate:?}");
            return false;
        }

        self.path[index] = coordinate;
        self.changed(false);
        true
    }

    pub(crate) fn remove_coordinate(&mut self, coordinate: &GeoCoordinate) -> bool {
        match self.path.iter().rposition(|c| c == coordinate) {
            Some(index) => self.remove_coordinate_at(index),
            None => false,
        }
    }

    pub(crate) fn remove_coordinate_at(&mut self, index: usize) -> bool {
        if index >= self.path.len() {
            log::trace!("Rejected removal of index {index} from {} coordinates", self.path.len());
            return false;
        }

        self.path.remove(index);
        self.changed(false);
        true
    }

    /// Moves all coordinates. Latitude offset is clamped so that no coordinate goes past a pole. Returns the
    /// latitude offset that was actually applied, or `None` if the offsets are not finite.
    pub(crate) fn translate(&mut self, d_lat: f64, d_lon: f64) -> Option<f64> {
        if !is_valid_offset(d_lat, d_lon) {
            return None;
        }

        let cache = self.cache.get_mut();
        cache.recompute(&self.path);

        let d_lat = if self.path.is_empty() {
            d_lat
        } else if d_lat > 0.0 {
            d_lat.min(90.0 - cache.accumulator.max_latitude())
        } else {
            d_lat.max(-90.0 - cache.accumulator.min_latitude())
        };

        translate_coordinates(&mut self.path, d_lat, d_lon);
        self.cache.get_mut().recompute(&self.path);

        Some(d_lat)
    }

    pub(crate) fn length(&self, from: usize, to: Option<usize>) -> f64 {
        let Some(last) = self.path.len().checked_sub(1) else {
            return 0.0;
        };

        let wrap = to.is_none();
        let to = to.map_or(last, |to| to.min(last));
        let mut length: f64 = (from..to)
            .map(|i| self.path[i].distance_to(&self.path[i + 1]))
            .sum();

        if wrap {
            length += self.path[last].distance_to(&self.path[0]);
        }

        length
    }

    /// Bounds of the sequence, recomputed first if stale.
    pub(crate) fn bounds(&self) -> Ref<'_, BoundsCache> {
        {
            let mut cache = self.cache.borrow_mut();
            if cache.dirty {
                cache.recompute(&self.path);
            }
        }

        self.cache.borrow()
    }

    /// Returns true if `coordinate` is within `line_radius` meters of the rhumb line polyline through the sequence.
    pub(crate) fn line_contains(&self, coordinate: &GeoCoordinate, line_radius: f64) -> bool {
        if !coordinate.is_valid() {
            return false;
        }

        match self.path.as_slice() {
            [] => return false,
            [single] => return single.distance_to(coordinate) <= line_radius,
            _ => {}
        }

        let left_bound = self.bounds().left_bound_wrapped();
        let point = wrapped_mercator(coordinate, left_bound);

        for pair in self.path.windows(2) {
            let a = wrapped_mercator(&pair[0], left_bound);
            let b = wrapped_mercator(&pair[1], left_bound);
            if a == b {
                continue;
            }

            let mut candidate = Segment(a, b).closest_point(&point);
            if candidate.x() > 1.0 {
                candidate.set_x(candidate.x() - 1.0);
            }

            if coordinate.distance_to(&mercator_to_coord(&candidate)) <= line_radius {
                return true;
            }
        }

        self.path[0].distance_to(coordinate) <= line_radius
    }

    fn changed(&mut self, appended: bool) {
        let cache = self.cache.get_mut();
        match self.policy {
            BoundingBoxPolicy::Lazy => cache.dirty = true,
            BoundingBoxPolicy::Eager if appended => cache.update(&self.path),
            BoundingBoxPolicy::Eager => cache.recompute(&self.path),
        }
    }
}

impl PartialEq for PathCore {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

/// Projects a coordinate into the Mercator plane, moving it one map width east if it is west of `left_bound`.
pub(crate) fn wrapped_mercator(coordinate: &GeoCoordinate, left_bound: f64) -> Vector2 {
    let mut projected = coord_to_mercator(coordinate);
    if projected.x() < left_bound {
        projected.set_x(projected.x() + 1.0);
    }

    projected
}

pub(crate) fn translate_coordinates(coordinates: &mut [GeoCoordinate], d_lat: f64, d_lon: f64) {
    for coordinate in coordinates {
        coordinate.set_latitude(clip_lat(coordinate.latitude() + d_lat));
        coordinate.set_longitude(wrap_lon(coordinate.longitude() + d_lon));
    }
}

pub(crate) fn fmt_coordinates(
    f: &mut Formatter<'_>,
    coordinates: &[GeoCoordinate],
) -> std::fmt::Result {
    write!(f, "[ ")?;
    for (i, coordinate) in coordinates.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{{{coordinate}}}")?;
    }
    write!(f, " ]")
}

/// Ordered sequence of coordinates connected by rhumb lines, with a line width in meters.
///
/// A coordinate is contained in the path if it is not farther than half of the width (but at least
/// [`MIN_LINE_RADIUS`]) from the line. The path is valid if it has at least one coordinate.
///
/// Bounding box of the path is cached. With [`BoundingBoxPolicy::Lazy`] (default) it is recomputed on the first query
/// after a change; with [`BoundingBoxPolicy::Eager`] every change updates it right away. Queries take `&self` and
/// update the cache through interior mutability, so a path cannot be shared between threads without
/// synchronization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PathRepr", into = "PathRepr")]
pub struct GeoPath {
    core: PathCore,
    width: f64,
}

impl GeoPath {
    /// Creates a path of zero width. If any of the coordinates is invalid, an empty path is created.
    pub fn new(path: Vec<GeoCoordinate>) -> Self {
        Self {
            core: PathCore::new(path, BoundingBoxPolicy::Lazy),
            width: 0.0,
        }
    }

    /// Sets the line width in meters. Negative and `NaN` values are ignored.
    pub fn with_width(mut self, width: f64) -> Self {
        self.set_width(width);
        self
    }

    /// Sets the policy of bounding box computation.
    pub fn with_policy(mut self, policy: BoundingBoxPolicy) -> Self {
        self.set_policy(policy);
        self
    }

    /// Creates a path from a generic shape. Any shape other than a path results in an empty path.
    pub fn from_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Path(path) => path.clone(),
            other => {
                log::debug!("Cannot convert {:?} into a path", other.shape_type());
                Self::default()
            }
        }
    }

    /// Coordinates of the path.
    pub fn path(&self) -> &[GeoCoordinate] {
        self.core.path()
    }

    /// Replaces all coordinates. Nothing is changed if any of the coordinates is invalid.
    pub fn set_path(&mut self, path: Vec<GeoCoordinate>) {
        self.core.set_path(path);
    }

    /// Removes all coordinates.
    pub fn clear_path(&mut self) {
        self.core.clear();
    }

    /// Line width in meters.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the line width in meters. Negative and `NaN` values are ignored.
    pub fn set_width(&mut self, width: f64) {
        if width.is_nan() || width < 0.0 {
            log::trace!("Rejected path width {width}");
            return;
        }

        self.width = width;
    }

    /// Policy of bounding box computation.
    pub fn policy(&self) -> BoundingBoxPolicy {
        self.core.policy()
    }

    /// Changes the policy of bounding box computation. Switching to eager policy computes the bounding box at once.
    pub fn set_policy(&mut self, policy: BoundingBoxPolicy) {
        self.core.set_policy(policy);
    }

    /// Number of coordinates.
    pub fn size(&self) -> usize {
        self.core.path().len()
    }

    /// Coordinate at the given index, or an invalid coordinate if the index is out of range.
    pub fn coordinate_at(&self, index: usize) -> GeoCoordinate {
        self.core.path().get(index).copied().unwrap_or_default()
    }

    /// Returns true if the path has a vertex equal to `coordinate`.
    pub fn contains_coordinate(&self, coordinate: &GeoCoordinate) -> bool {
        self.core.path().contains(coordinate)
    }

    /// Appends a coordinate. Invalid coordinates are ignored.
    pub fn add_coordinate(&mut self, coordinate: GeoCoordinate) {
        self.core.add_coordinate(coordinate);
    }

    /// Inserts a coordinate at `index`. Invalid coordinates and indices greater than [`GeoPath::size`] are ignored.
    pub fn insert_coordinate(&mut self, index: usize, coordinate: GeoCoordinate) {
        self.core.insert_coordinate(index, coordinate);
    }

    /// Replaces the coordinate at `index`. Invalid coordinates and out of range indices are ignored.
    pub fn replace_coordinate(&mut self, index: usize, coordinate: GeoCoordinate) {
        self.core.replace_coordinate(index, coordinate);
    }

    /// Removes the last occurrence of `coordinate`.
    pub fn remove_coordinate(&mut self, coordinate: &GeoCoordinate) {
        self.core.remove_coordinate(coordinate);
    }

    /// Removes the coordinate at `index`. Out of range indices are ignored.
    pub fn remove_coordinate_at(&mut self, index: usize) {
        self.core.remove_coordinate_at(index);
    }

    /// Sum of great circle distances between consecutive coordinates from `from` to `to` index, in meters.
    ///
    /// `to` greater than the last index is treated as the last index. `None` means the closed loop: the length up to
    /// the last coordinate plus the distance from the last coordinate back to the first one.
    pub fn length(&self, from: usize, to: Option<usize>) -> f64 {
        self.core.length(from, to)
    }

    /// Moves the path by `d_lat` degrees northward and `d_lon` degrees eastward.
    ///
    /// The latitude offset is reduced so that no coordinate of the path goes past a pole.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        self.core.translate(d_lat, d_lon);
    }

    /// Returns a copy of the path moved by `d_lat` degrees northward and `d_lon` degrees eastward.
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = self.clone();
        result.translate(d_lat, d_lon);
        result
    }

    fn line_radius(&self) -> f64 {
        (self.width / 2.0).max(MIN_LINE_RADIUS)
    }
}

impl GeoShape for GeoPath {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Path
    }

    fn is_valid(&self) -> bool {
        !self.core.path().is_empty()
    }

    fn is_empty(&self) -> bool {
        self.core.path().is_empty()
    }

    fn contains(&self, coordinate: &GeoCoordinate) -> bool {
        self.core.line_contains(coordinate, self.line_radius())
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

impl PartialEq for GeoPath {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.width == other.width
    }
}

impl Display for GeoPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeoPath(")?;
        fmt_coordinates(f, self.path())?;
        write!(f, ")")
    }
}

impl From<Vec<GeoCoordinate>> for GeoPath {
    fn from(value: Vec<GeoCoordinate>) -> Self {
        Self::new(value)
    }
}

#[derive(Serialize, Deserialize)]
struct PathRepr {
    path: Vec<GeoCoordinate>,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    policy: BoundingBoxPolicy,
}

impl From<PathRepr> for GeoPath {
    fn from(value: PathRepr) -> Self {
        Self::new(value.path)
            .with_width(value.width)
            .with_policy(value.policy)
    }
}

impl From<GeoPath> for PathRepr {
    fn from(value: GeoPath) -> Self {
        Self {
            policy: value.policy(),
            width: value.width,
            path: value.core.path,
        }
    }
}
