//! Well-Known Text: `POLYGON((x1 y1,x2 y2,...,x1 y1))`, no SRID prefix

use super::{ShapeCodec, fixed};
use crate::geometry::MIN_RING_POINTS;
use crate::{BoundingBox, CodecError, Format, Geometry, Result, Ring};
use geo::Coord;
use once_cell::sync::Lazy;
use regex::Regex;

/// `POLYGON((...))` with optional keyword, any letter case and free whitespace
static POLYGON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*(?:POLYGON)?\s*\(\s*\((?P<body>[^()]*)\)\s*\)\s*$")
        .expect("valid WKT polygon regex")
});

/// Format display coordinates as a WKT polygon, closing the ring if needed
pub fn write_polygon(coords: &[Coord<f64>], decimals: usize) -> String {
    let mut points: Vec<String> = coords
        .iter()
        .map(|c| format!("{} {}", fixed(c.x, decimals), fixed(c.y, decimals)))
        .collect();
    if coords.first() != coords.last() {
        points.push(points[0].clone());
    }
    format!("POLYGON(({}))", points.join(","))
}

/// Parse a WKT polygon (or a bare `x y, x y, ...` list) into coordinates
///
/// Fails with [`CodecError::InvalidWkt`] on malformed pairs or fewer than three points.
pub fn parse_polygon(text: &str) -> Result<Vec<Coord<f64>>> {
    let body = match POLYGON_RE.captures(text) {
        Some(caps) => caps.name("body").map_or("", |m| m.as_str()),
        None if !text.contains(['(', ')']) => text,
        None => {
            return Err(CodecError::InvalidWkt(
                "expected POLYGON((x1 y1, x2 y2, ...))".to_string(),
            ));
        }
    };

    let coords = body
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(parse_pair)
        .collect::<Result<Vec<_>>>()?;

    if coords.len() < MIN_RING_POINTS {
        return Err(CodecError::InvalidWkt(format!(
            "a polygon must have at least {MIN_RING_POINTS} points, got {}",
            coords.len()
        )));
    }
    Ok(coords)
}

fn parse_pair(pair: &str) -> Result<Coord<f64>> {
    let mut parts = pair.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CodecError::InvalidWkt(format!(
            "expected 'x y', got '{pair}'"
        )));
    };
    let parse = |v: &str| {
        v.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| CodecError::InvalidWkt(format!("invalid number '{v}' in '{pair}'")))
    };
    Ok(Coord {
        x: parse(x)?,
        y: parse(y)?,
    })
}

impl ShapeCodec {
    /// WKT of a ring or bounding box rectangle in the display CRS
    pub fn to_wkt(&self, geometry: &Geometry, crs: &str) -> Result<String> {
        let frame = self.frame(crs)?;
        let coords = match geometry {
            Geometry::Ring(ring) => frame.project_all(ring.coords())?,
            Geometry::BoundingBox(bbox) => {
                // Corners are projected first, the rectangle is built in the display CRS
                BoundingBox::new(frame.project(bbox.sw)?, frame.project(bbox.ne)?)
                    .to_ring_coords()
            }
            other => {
                return Err(CodecError::UnsupportedFormat {
                    format: Format::Wkt,
                    kind: other.kind(),
                });
            }
        };
        Ok(write_polygon(&coords, frame.decimals))
    }

    /// Ring from WKT in the given CRS, reprojected to EPSG:4326
    pub fn from_wkt(&self, text: &str, crs: &str) -> Result<Ring> {
        let frame = self.frame(crs)?;
        let coords = parse_polygon(text)?;
        Ring::new(frame.unproject_all(&coords)?)
    }
}
