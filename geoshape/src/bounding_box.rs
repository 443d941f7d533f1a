//! Antimeridian-aware bounding box computation for coordinate sequences.

use serde::{Deserialize, Serialize};

use crate::coordinate::GeoCoordinate;
use crate::shape::GeoRectangle;

/// Defines when derived geometry of a path or polygon (bounding box, clipper path) is recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundingBoxPolicy {
    /// Mutations only mark the derived state as stale. It is recomputed from scratch by the next query.
    #[default]
    Lazy,
    /// Every mutation updates the derived state immediately. Appending a coordinate is `O(1)`.
    Eager,
}

/// Computes the bounding rectangle of a coordinate sequence.
///
/// Longitude of every coordinate is stored as an accumulated delta from the longitude of the first coordinate. Every
/// step between consecutive coordinates is taken the short way (never longer than 180 degrees), but the accumulated
/// deltas are not wrapped. This makes it possible to tell a sequence that goes around the globe from one that goes
/// back and forth across the antimeridian. If the deltas span 360 degrees or more, the box covers all longitudes.
///
/// The deltas are retained so that appending a coordinate can update the box without visiting the whole sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundingBoxAccumulator {
    deltas: Vec<f64>,
    min_id: usize,
    max_id: usize,
    min_delta: f64,
    max_delta: f64,
    min_lat: f64,
    max_lat: f64,
}

impl BoundingBoxAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the state from scratch for the given sequence and returns its bounding rectangle.
    ///
    /// For an empty sequence the state is cleared and an invalid rectangle is returned.
    pub fn compute(&mut self, path: &[GeoCoordinate]) -> GeoRectangle {
        log::trace!("Full bounding box computation for {} coordinates", path.len());

        let Some(first) = path.first() else {
            self.clear();
            return GeoRectangle::default();
        };

        self.deltas.clear();
        self.deltas.reserve(path.len());
        self.deltas.push(0.0);
        self.min_id = 0;
        self.max_id = 0;
        self.min_delta = 0.0;
        self.max_delta = 0.0;
        self.min_lat = first.latitude();
        self.max_lat = first.latitude();

        for (i, pair) in path.windows(2).enumerate() {
            let delta = self.last_delta() + lon_step(&pair[0], &pair[1]);
            self.deltas.push(delta);
            self.track_extremes(i + 1, delta, pair[1].latitude());
        }

        self.rectangle(path)
    }

    /// Updates the state after the sequence was changed and returns the new bounding rectangle.
    ///
    /// If exactly one coordinate was appended since the last computation, only that coordinate is visited. Any other
    /// change results in a full recomputation.
    pub fn update(&mut self, path: &[GeoCoordinate]) -> GeoRectangle {
        if path.is_empty() {
            self.clear();
            return GeoRectangle::default();
        }

        if path.len() == 1 || path.len() != self.deltas.len() + 1 {
            return self.compute(path);
        }

        let from = &path[path.len() - 2];
        let to = &path[path.len() - 1];
        let delta = self.last_delta() + lon_step(from, to);
        self.deltas.push(delta);
        self.track_extremes(path.len() - 1, delta, to.latitude());

        self.rectangle(path)
    }

    /// Clears the state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Accumulated longitude deltas of the coordinates, relative to the first one.
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Smallest accumulated longitude delta.
    pub fn min_delta(&self) -> f64 {
        self.min_delta
    }

    /// Largest accumulated longitude delta.
    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// Smallest latitude of the sequence.
    pub fn min_latitude(&self) -> f64 {
        self.min_lat
    }

    /// Largest latitude of the sequence.
    pub fn max_latitude(&self) -> f64 {
        self.max_lat
    }

    /// Returns true if the sequence spans all longitudes.
    pub fn is_full_globe(&self) -> bool {
        self.max_delta - self.min_delta >= 360.0
    }

    fn last_delta(&self) -> f64 {
        self.deltas.last().copied().unwrap_or(0.0)
    }

    fn track_extremes(&mut self, index: usize, delta: f64, lat: f64) {
        if delta < self.min_delta {
            self.min_delta = delta;
            self.min_id = index;
        }
        if delta > self.max_delta {
            self.max_delta = delta;
            self.max_id = index;
        }

        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    fn rectangle(&self, path: &[GeoCoordinate]) -> GeoRectangle {
        if self.is_full_globe() {
            return GeoRectangle::new(
                GeoCoordinate::new(self.max_lat, -180.0),
                GeoCoordinate::new(self.min_lat, 180.0),
            );
        }

        let west = path[self.min_id].longitude();
        let east = path[self.max_id].longitude();
        GeoRectangle::new(
            GeoCoordinate::new(self.max_lat, west),
            GeoCoordinate::new(self.min_lat, east),
        )
    }
}

/// Shortest signed longitude step from `from` to `to`.
fn lon_step(from: &GeoCoordinate, to: &GeoCoordinate) -> f64 {
    let lon_from = from.longitude();
    let mut lon_to = to.longitude();
    if (lon_to - lon_from).abs() > 180.0 {
        if lon_to > 0.0 {
            lon_to -= 360.0;
        } else {
            lon_to += 360.0;
        }
    }

    lon_to - lon_from
}
