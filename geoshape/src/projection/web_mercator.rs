use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::marker::PhantomData;

use crate::cartesian::Vector2;
use crate::coordinate::GeoCoordinate;
use crate::projection::{NewGeoPoint, Projection};

/// Largest latitude that is projected without clamping. Poles are at infinity in Mercator space.
const MAX_MERCATOR_LAT: f64 = 90.0 - 1e-9;

/// Web Mercator projection into the normalized plane: `x` and `y` are both in `[0, 1]`, longitude `-180` maps to
/// `x = 0`, longitude `180` to `x = 1`, and `y` grows southward.
///
/// The projection itself is stateless, the type parameter only selects the geographic point type.
#[derive(Debug, Copy, Clone)]
pub struct WebMercator<In = GeoCoordinate> {
    phantom: PhantomData<In>,
}

impl<In> WebMercator<In> {
    /// Creates a new projection.
    pub fn new() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<In> Default for WebMercator<In> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: NewGeoPoint<f64>> Projection for WebMercator<In> {
    type InPoint = In;
    type OutPoint = Vector2;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let projected = project_lat_lon(input.lat(), input.lon());
        if projected.x().is_finite() && projected.y().is_finite() {
            Some(projected)
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        if !input.x().is_finite() || !input.y().is_finite() {
            return None;
        }

        let (lat, lon) = unproject_lat_lon(input);
        Some(In::latlon(lat, lon))
    }
}

/// Projects a geographic coordinate into the normalized Mercator plane.
///
/// Latitude is clamped to `±(90 - 1e-9)` so the poles produce finite values. Longitude is not clamped, so
/// coordinates outside of `[-180, 180]` produce `x` outside of `[0, 1]`.
pub fn coord_to_mercator(coordinate: &GeoCoordinate) -> Vector2 {
    project_lat_lon(coordinate.latitude(), coordinate.longitude())
}

/// Converts a point of the normalized Mercator plane back into a geographic coordinate.
///
/// `x` values outside of `[0, 1]` are wrapped back into the range before conversion.
pub fn mercator_to_coord(mercator: &Vector2) -> GeoCoordinate {
    let (lat, lon) = unproject_lat_lon(mercator);
    GeoCoordinate::new(lat, lon)
}

/// Interpolates between two coordinates along the straight Mercator line (rhumb line) connecting them.
///
/// If the coordinates are more than half of the map width apart, the interpolation goes the shorter way across the
/// antimeridian. Altitude is interpolated linearly if both coordinates have it.
pub fn coordinate_interpolation(
    from: &GeoCoordinate,
    to: &GeoCoordinate,
    progress: f64,
) -> GeoCoordinate {
    let start = coord_to_mercator(from);
    let end = coord_to_mercator(to);

    let mut sx = start.x();
    let mut ex = end.x();
    let crosses_antimeridian = (ex - sx).abs() > 0.5;
    if crosses_antimeridian {
        if ex < sx {
            sx -= 1.0;
        } else if sx < ex {
            ex -= 1.0;
        }
    }

    let mut x = lerp(sx, ex, progress);
    if crosses_antimeridian && x < 0.0 && x.abs() > f64::EPSILON {
        x += 1.0;
    }

    let y = lerp(start.y(), end.y(), progress);
    let mut result = mercator_to_coord(&Vector2::new(x, y));

    if let (Some(from_alt), Some(to_alt)) = (from.altitude(), to.altitude()) {
        result.set_altitude(Some(lerp(from_alt, to_alt, progress)));
    }

    result
}

fn lerp(from: f64, to: f64, progress: f64) -> f64 {
    (1.0 - progress) * from + progress * to
}

fn project_lat_lon(lat: f64, lon: f64) -> Vector2 {
    let x = lon / 360.0 + 0.5;
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = (1.0 - (FRAC_PI_4 + lat / 2.0).tan().ln() / PI) / 2.0;

    Vector2::new(x, y)
}

fn unproject_lat_lon(mercator: &Vector2) -> (f64, f64) {
    let x = mercator.x();
    let x = if (0.0..=1.0).contains(&x) {
        x
    } else {
        x.rem_euclid(1.0)
    };

    let lon = x * 360.0 - 180.0;
    let lat = 2.0 * (PI * (1.0 - 2.0 * mercator.y())).exp().atan() - FRAC_PI_2;

    (lat.to_degrees(), lon)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn projection_of_known_points() {
        assert_abs_diff_eq!(
            coord_to_mercator(&GeoCoordinate::new(0.0, 0.0)),
            Vector2::new(0.5, 0.5),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(coord_to_mercator(&GeoCoordinate::new(0.0, -180.0)).x(), 0.0);
        assert_abs_diff_eq!(coord_to_mercator(&GeoCoordinate::new(0.0, 180.0)).x(), 1.0);

        let north = coord_to_mercator(&GeoCoordinate::new(45.0, 90.0));
        assert_abs_diff_eq!(north.x(), 0.75);
        assert!(north.y() < 0.5);

        let pole = coord_to_mercator(&GeoCoordinate::new(90.0, 0.0));
        assert!(pole.y().is_finite());
    }

    #[test]
    fn round_trip() {
        for lat in (-89..=89).step_by(7) {
            for lon in (-180..=180).step_by(15) {
                let lat = lat as f64 + 0.25;
                let lon = lon as f64;
                let coordinate = GeoCoordinate::new(lat, lon);
                let restored = mercator_to_coord(&coord_to_mercator(&coordinate));

                assert_relative_eq!(restored, coordinate, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn unprojection_wraps_x() {
        let coordinate = mercator_to_coord(&Vector2::new(1.25, 0.5));
        assert_abs_diff_eq!(coordinate.longitude(), -90.0, epsilon = 1e-9);

        let coordinate = mercator_to_coord(&Vector2::new(-0.25, 0.5));
        assert_abs_diff_eq!(coordinate.longitude(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn projection_trait() {
        let projection = WebMercator::<GeoCoordinate>::new();
        let projected = projection
            .project(&GeoCoordinate::new(10.0, 20.0))
            .expect("valid point");
        let restored = projection.unproject(&projected).expect("finite point");

        assert_relative_eq!(restored, GeoCoordinate::new(10.0, 20.0), epsilon = 1e-9);
        assert!(projection
            .unproject(&Vector2::new(f64::NAN, 0.0))
            .is_none());
    }

    #[test]
    fn interpolation() {
        let from = GeoCoordinate::with_altitude(0.0, 0.0, 0.0);
        let to = GeoCoordinate::with_altitude(0.0, 10.0, 100.0);

        let middle = coordinate_interpolation(&from, &to, 0.5);
        assert_abs_diff_eq!(middle.latitude(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(middle.longitude(), 5.0, epsilon = 1e-9);
        assert_eq!(middle.altitude(), Some(50.0));

        assert_relative_eq!(coordinate_interpolation(&from, &to, 0.0), from, epsilon = 1e-9);
        assert_relative_eq!(coordinate_interpolation(&from, &to, 1.0), to, epsilon = 1e-9);
    }

    #[test]
    fn interpolation_across_antimeridian() {
        let from = GeoCoordinate::new(0.0, 170.0);
        let to = GeoCoordinate::new(0.0, -170.0);

        let middle = coordinate_interpolation(&from, &to, 0.5);
        assert_abs_diff_eq!(middle.longitude().abs(), 180.0, epsilon = 1e-9);

        let quarter = coordinate_interpolation(&from, &to, 0.25);
        assert_abs_diff_eq!(quarter.longitude(), 175.0, epsilon = 1e-9);

        let three_quarters = coordinate_interpolation(&to, &from, 0.25);
        assert_abs_diff_eq!(three_quarters.longitude(), -175.0, epsilon = 1e-9);
    }
}
