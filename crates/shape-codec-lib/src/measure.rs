//! Area of drawn polygons and rectangles

use crate::Geometry;
use geo::ChamberlainDuquetteArea;

/// Unsigned area in square meters on a spherical earth
///
/// Only rings and bounding boxes have an area; circles and markers yield `None`.
pub fn geodesic_area(geometry: &Geometry) -> Option<f64> {
    let polygon = match geometry {
        Geometry::Ring(ring) => ring.to_polygon(),
        Geometry::BoundingBox(bbox) => bbox.to_ring().to_polygon(),
        Geometry::Circle(_) | Geometry::Marker(_) => return None,
    };
    Some(polygon.chamberlain_duquette_unsigned_area())
}

/// `"<area> m²"` with two decimals
pub fn format_area(area_m2: f64) -> String {
    format!("{area_m2:.2} m²")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundingBox, Circle, Marker, Ring};
    use geo::Coord;

    #[test]
    fn test_small_square_at_equator() {
        // 0.01° x 0.01° is roughly 1113 m x 1113 m
        let ring = Ring::from_pairs(&[[0.0, 0.0], [0.01, 0.0], [0.01, 0.01], [0.0, 0.01]]).unwrap();
        let area = geodesic_area(&Geometry::Ring(ring)).unwrap();
        assert!((area - 1_239_000.0).abs() < 10_000.0, "area = {area}");
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let ccw = Ring::from_pairs(&[[8.80, 47.22], [8.82, 47.22], [8.82, 47.24], [8.80, 47.24]]).unwrap();
        let cw = Ring::from_pairs(&[[8.80, 47.22], [8.80, 47.24], [8.82, 47.24], [8.82, 47.22]]).unwrap();
        let a = geodesic_area(&Geometry::Ring(ccw)).unwrap();
        let b = geodesic_area(&Geometry::Ring(cw)).unwrap();
        assert!(a > 0.0);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_bbox_matches_equivalent_ring() {
        let bbox = BoundingBox::new(Coord { x: 8.80, y: 47.22 }, Coord { x: 8.82, y: 47.24 });
        let ring = bbox.to_ring();
        let a = geodesic_area(&Geometry::BoundingBox(bbox)).unwrap();
        let b = geodesic_area(&Geometry::Ring(ring)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_area_for_points_and_circles() {
        let c = Coord { x: 1.0, y: 2.0 };
        assert_eq!(geodesic_area(&Geometry::Marker(Marker::new(c))), None);
        assert_eq!(geodesic_area(&Geometry::Circle(Circle::new(c, 10.0))), None);
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(1234.5678), "1234.57 m²");
        assert_eq!(format_area(0.0), "0.00 m²");
    }
}
