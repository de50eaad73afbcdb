//! Circle display text: `Center: [x, y], Radius: r meters`

use super::{ShapeCodec, fixed};
use crate::{Circle, CodecError, Result};
use geo::Coord;
use once_cell::sync::Lazy;
use regex::Regex;

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

static CIRCLE_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?i)^\s*Center:\s*\[\s*(?P<x>{NUMBER})\s*,\s*(?P<y>{NUMBER})\s*\]\s*,\s*Radius:\s*(?P<r>{NUMBER})\s*meters?\s*$"
    );
    Regex::new(&pattern).expect("valid circle text regex")
});

/// Circle text from a center already in the display CRS
pub fn write_circle(
    center: Coord<f64>,
    radius_m: f64,
    decimals: usize,
    radius_decimals: usize,
) -> String {
    format!(
        "Center: [{}, {}], Radius: {} meters",
        fixed(center.x, decimals),
        fixed(center.y, decimals),
        fixed(radius_m, radius_decimals)
    )
}

/// Parse circle text into its center (display CRS) and radius in meters
pub fn parse_circle_text(text: &str) -> Result<(Coord<f64>, f64)> {
    let caps = CIRCLE_RE.captures(text).ok_or_else(|| {
        CodecError::InvalidCircleFormat(format!(
            "expected 'Center: [x, y], Radius: r meters', got '{}'",
            text.trim()
        ))
    })?;

    let number = |name: &str| -> Result<f64> {
        caps.name(name)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| CodecError::InvalidCircleFormat(format!("invalid {name} value")))
    };

    let center = Coord {
        x: number("x")?,
        y: number("y")?,
    };
    let radius = number("r")?;
    if radius < 0.0 {
        return Err(CodecError::InvalidCircleFormat(format!(
            "radius must not be negative, got {radius}"
        )));
    }
    Ok((center, radius))
}

impl ShapeCodec {
    /// Circle text with the center in the display CRS; the radius stays in meters
    pub fn to_circle_text(&self, circle: &Circle, crs: &str) -> Result<String> {
        let frame = self.frame(crs)?;
        Ok(write_circle(
            frame.project(circle.center)?,
            circle.radius_m,
            frame.decimals,
            self.config().radius_decimals,
        ))
    }

    /// Circle from its display text in the given CRS, center reprojected to EPSG:4326
    pub fn from_circle_text(&self, text: &str, crs: &str) -> Result<Circle> {
        let frame = self.frame(crs)?;
        let (center, radius_m) = parse_circle_text(text)?;
        let center = frame.unproject_all(&[center])?[0];
        Ok(Circle::new(center, radius_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{EPSG_4326, EPSG_32633};
    use crate::{Format, Geometry};

    #[test]
    fn test_write_geographic() {
        let codec = ShapeCodec::default();
        let circle = Circle::new(Coord { x: 8.8184, y: 47.2265 }, 1234.5678);
        assert_eq!(
            codec.to_circle_text(&circle, EPSG_4326).unwrap(),
            "Center: [8.818400, 47.226500], Radius: 1234.57 meters"
        );
    }

    #[test]
    fn test_radius_is_not_projected() {
        let codec = ShapeCodec::default();
        let circle = Circle::new(Coord { x: 15.0, y: 0.0 }, 250.0);
        assert_eq!(
            codec.to_circle_text(&circle, EPSG_32633).unwrap(),
            "Center: [500000.00, 0.00], Radius: 250.00 meters"
        );
    }

    #[test]
    fn test_parse_variants() {
        let (center, radius) = parse_circle_text("Center: [8.8, 47.2], Radius: 100 meters").unwrap();
        assert_eq!(center, Coord { x: 8.8, y: 47.2 });
        assert_eq!(radius, 100.0);

        let (center, _) = parse_circle_text("center:[-70.5,-33.45],radius: 1.5e3 meter").unwrap();
        assert_eq!(center, Coord { x: -70.5, y: -33.45 });
    }

    #[test]
    fn test_malformed_circle_text() {
        for bad in [
            "Center: [abc], Radius: 5 meters",
            "Center: [1, 2], Radius: meters",
            "Center: [1, 2]",
            "Radius: 5 meters",
            "Center: [1, 2], Radius: -5 meters",
            "",
        ] {
            assert!(
                matches!(parse_circle_text(bad), Err(CodecError::InvalidCircleFormat(_))),
                "{bad:?} should fail"
            );
        }
    }

    #[test]
    fn test_decode_projected_circle() {
        let codec = ShapeCodec::default();
        let decoded = codec
            .decode(
                "Center: [500000.00, 0.00], Radius: 250.00 meters",
                Format::Circle,
                EPSG_32633,
            )
            .unwrap();
        let Geometry::Circle(circle) = decoded else {
            panic!("expected a circle, got {decoded:?}");
        };
        assert!((circle.center.x - 15.0).abs() < 1e-9);
        assert!(circle.center.y.abs() < 1e-9);
        assert_eq!(circle.radius_m, 250.0);
    }
}
