//! Planar geometry used internally by the geographic shapes: vectors, segments and point-in-polygon tests.

mod clipper;
mod segment;
mod vector;

pub use clipper::ClipperPath;
pub use segment::Segment;
pub use vector::{Vector2, Vector3};
