//! Leaflet ordered pairs: a JSON array of `[lat, lng]` (or `[northing, easting]`)
//!
//! The axis order is flipped relative to every other format.

use super::{Format, ShapeCodec};
use crate::geometry::MIN_RING_POINTS;
use crate::{BoundingBox, CodecError, Geometry, Result, Ring};
use geo::Coord;
use serde_json::Value;

/// JSON text of `[y, x]` pairs
pub fn write_pairs(coords: &[Coord<f64>]) -> Result<String> {
    let pairs: Vec<[f64; 2]> = coords.iter().map(|c| [c.y, c.x]).collect();
    serde_json::to_string(&pairs).map_err(|e| CodecError::InvalidCoordinatePair(e.to_string()))
}

/// Parse a JSON array of `[y, x]` pairs into `(x, y)` coordinates
///
/// Every element must be an array of exactly two finite numbers. The point
/// count is not checked here.
pub fn parse_pairs(text: &str) -> Result<Vec<Coord<f64>>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CodecError::InvalidCoordinatePair(format!("not a JSON array: {e}")))?;
    let Value::Array(items) = value else {
        return Err(CodecError::InvalidCoordinatePair(
            "expected an array of [lat, lng] pairs".to_string(),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let pair = match item.as_array().map(Vec::as_slice) {
                Some([a, b]) => a.as_f64().zip(b.as_f64()),
                _ => None,
            };
            match pair {
                Some((lat, lng)) if lat.is_finite() && lng.is_finite() => {
                    Ok(Coord { x: lng, y: lat })
                }
                _ => Err(CodecError::InvalidCoordinatePair(format!(
                    "element {i} is not a [lat, lng] pair: {item}"
                ))),
            }
        })
        .collect()
}

impl ShapeCodec {
    /// Leaflet pairs of a ring, bounding box rectangle or marker in the display CRS
    ///
    /// Rings are written as stored; a marker is a single pair, not a list.
    pub fn to_leaflet(&self, geometry: &Geometry, crs: &str) -> Result<String> {
        let frame = self.frame(crs)?;
        match geometry {
            Geometry::Ring(ring) => {
                let coords = ring
                    .coords()
                    .iter()
                    .map(|&c| frame.project_rounded(c))
                    .collect::<Result<Vec<_>>>()?;
                write_pairs(&coords)
            }
            Geometry::BoundingBox(bbox) => {
                let rect = BoundingBox::new(
                    frame.project_rounded(bbox.sw)?,
                    frame.project_rounded(bbox.ne)?,
                );
                write_pairs(&rect.to_ring_coords())
            }
            Geometry::Marker(marker) => {
                let p = frame.project_rounded(marker.position)?;
                serde_json::to_string(&[p.y, p.x])
                    .map_err(|e| CodecError::InvalidCoordinatePair(e.to_string()))
            }
            Geometry::Circle(_) => Err(CodecError::UnsupportedFormat {
                format: Format::Leaflet,
                kind: geometry.kind(),
            }),
        }
    }

    /// Ring from Leaflet pairs in the given CRS, reprojected to EPSG:4326
    pub fn from_leaflet(&self, text: &str, crs: &str) -> Result<Ring> {
        let frame = self.frame(crs)?;
        let coords = parse_pairs(text)?;
        if coords.len() < MIN_RING_POINTS {
            return Err(CodecError::InvalidRing(format!(
                "a polygon needs at least {MIN_RING_POINTS} pairs, got {}",
                coords.len()
            )));
        }
        Ring::new(frame.unproject_all(&coords)?)
    }
}
