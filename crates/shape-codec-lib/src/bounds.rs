//! Bounding box calculator
//!
//! Bounds are always computed in EPSG:4326 degrees, independent of any display CRS.

use crate::{BoundingBox, Circle, CodecError, Geometry, Result};
use geo::Coord;

/// Earth circumference in meters used to turn a circle radius into degrees
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_017.0;

/// Bounds of a single shape
///
/// A ring folds min/max over its vertices, a marker is a zero-area box and a
/// circle is its center plus or minus the radius converted to degrees.
pub fn bounds_of(geometry: &Geometry) -> BoundingBox {
    match geometry {
        Geometry::Ring(ring) => {
            let mut min_x = f64::INFINITY;
            let mut min_y = f64::INFINITY;
            let mut max_x = f64::NEG_INFINITY;
            let mut max_y = f64::NEG_INFINITY;

            for c in ring.coords() {
                min_x = min_x.min(c.x);
                min_y = min_y.min(c.y);
                max_x = max_x.max(c.x);
                max_y = max_y.max(c.y);
            }

            BoundingBox {
                sw: Coord { x: min_x, y: min_y },
                ne: Coord { x: max_x, y: max_y },
            }
        }
        Geometry::Circle(circle) => circle_bounds(circle),
        Geometry::Marker(marker) => BoundingBox::point(marker.position),
        Geometry::BoundingBox(bbox) => *bbox,
    }
}

/// Degree box around a circle, widened in longitude by `1 / cos(lat)`
fn circle_bounds(circle: &Circle) -> BoundingBox {
    let lat_delta = circle.radius_m / EARTH_CIRCUMFERENCE_M * 360.0;
    let cos_lat = circle.center.y.to_radians().cos();
    // Near the poles the longitude span covers the whole globe
    let lng_delta = if cos_lat.abs() > f64::EPSILON {
        (lat_delta / cos_lat.abs()).min(180.0)
    } else {
        180.0
    };

    BoundingBox {
        sw: Coord {
            x: circle.center.x - lng_delta,
            y: circle.center.y - lat_delta,
        },
        ne: Coord {
            x: circle.center.x + lng_delta,
            y: circle.center.y + lat_delta,
        },
    }
}

/// Union bounding box over a set of shapes
///
/// Returns [`CodecError::NoShapes`] for an empty slice.
pub fn union_bounds(shapes: &[Geometry]) -> Result<BoundingBox> {
    let bounds = shapes
        .iter()
        .map(bounds_of)
        .reduce(|acc, b| acc.union(&b))
        .ok_or(CodecError::NoShapes)?;

    tracing::debug!(
        "Union bounds of {} shapes: [{}, {}, {}, {}]",
        shapes.len(),
        bounds.sw.x,
        bounds.sw.y,
        bounds.ne.x,
        bounds.ne.y
    );
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Marker, Ring};

    #[test]
    fn test_empty_is_no_shapes() {
        assert_eq!(union_bounds(&[]), Err(CodecError::NoShapes));
    }

    #[test]
    fn test_single_marker_is_zero_area() {
        let at = Coord { x: 8.8184, y: 47.2265 };
        let bounds = union_bounds(&[Geometry::Marker(Marker::new(at))]).unwrap();
        assert_eq!(bounds.sw, at);
        assert_eq!(bounds.ne, at);
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
    }

    #[test]
    fn test_ring_bounds() {
        let ring = Ring::from_pairs(&[[8.80, 47.22], [8.82, 47.21], [8.81, 47.24]]).unwrap();
        let bounds = bounds_of(&Geometry::Ring(ring));
        assert_eq!(bounds.sw, Coord { x: 8.80, y: 47.21 });
        assert_eq!(bounds.ne, Coord { x: 8.82, y: 47.24 });
    }

    #[test]
    fn test_circle_bounds_at_equator() {
        let circle = Circle::new(Coord { x: 0.0, y: 0.0 }, EARTH_CIRCUMFERENCE_M / 360.0);
        let bounds = bounds_of(&Geometry::Circle(circle));
        assert!((bounds.sw.y + 1.0).abs() < 1e-12);
        assert!((bounds.ne.y - 1.0).abs() < 1e-12);
        assert!((bounds.ne.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_bounds_widen_with_latitude() {
        let circle = Circle::new(Coord { x: 10.0, y: 60.0 }, 1000.0);
        let bounds = bounds_of(&Geometry::Circle(circle));
        // cos(60°) = 0.5, so the longitude span is twice the latitude span
        assert!((bounds.width() - 2.0 * bounds.height()).abs() < 1e-9);
    }

    #[test]
    fn test_circle_at_pole_does_not_blow_up() {
        let circle = Circle::new(Coord { x: 0.0, y: 90.0 }, 1000.0);
        let bounds = bounds_of(&Geometry::Circle(circle));
        assert!(bounds.sw.x.is_finite() && bounds.ne.x.is_finite());
    }

    #[test]
    fn test_union_of_mixed_shapes() {
        let shapes = [
            Geometry::Marker(Marker::new(Coord { x: -1.0, y: 5.0 })),
            Geometry::Ring(Ring::from_pairs(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]).unwrap()),
            Geometry::BoundingBox(BoundingBox::new(
                Coord { x: 1.0, y: -3.0 },
                Coord { x: 1.5, y: -2.0 },
            )),
        ];
        let bounds = union_bounds(&shapes).unwrap();
        assert_eq!(bounds.sw, Coord { x: -1.0, y: -3.0 });
        assert_eq!(bounds.ne, Coord { x: 2.0, y: 5.0 });
    }
}
