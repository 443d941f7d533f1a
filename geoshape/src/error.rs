//! Error type used by the crate.

use thiserror::Error;

use crate::shape::ShapeType;

/// Error enum.
///
/// Mutating operations on shapes never fail: invalid input is ignored. This error is only returned by the explicit
/// conversion APIs.
#[derive(Debug, Error)]
pub enum GeoShapeError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// The source shape of a conversion is not valid.
    #[error("cannot convert an invalid {0:?} shape")]
    InvalidShape(ShapeType),
}
