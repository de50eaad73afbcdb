//! Bounding box array: `[swX,swY,neX,neY]`

use super::{ShapeCodec, fixed};
use crate::{BoundingBox, CodecError, Result, Ring};
use geo::Coord;

/// `[swX,swY,neX,neY]` with fixed decimals, no spaces
pub fn write_bbox(sw: Coord<f64>, ne: Coord<f64>, decimals: usize) -> String {
    format!(
        "[{},{},{},{}]",
        fixed(sw.x, decimals),
        fixed(sw.y, decimals),
        fixed(ne.x, decimals),
        fixed(ne.y, decimals)
    )
}

/// Parse `[a,b,c,d]` (brackets optional) into four numbers
pub fn parse_bbox(text: &str) -> Result<[f64; 4]> {
    let inner = text.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    let values = inner
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| CodecError::InvalidBBox(format!("'{}' is not a number", v.trim())))
        })
        .collect::<Result<Vec<_>>>()?;

    <[f64; 4]>::try_from(values).map_err(|values| {
        CodecError::InvalidBBox(format!("expected 4 numbers, got {}", values.len()))
    })
}

/// Closed rectangle SW, SE, NE, NW, SW from `[a,b,c,d]`
pub fn expand_bbox([a, b, c, d]: [f64; 4]) -> Vec<Coord<f64>> {
    vec![
        Coord { x: a, y: b },
        Coord { x: c, y: b },
        Coord { x: c, y: d },
        Coord { x: a, y: d },
        Coord { x: a, y: b },
    ]
}

impl ShapeCodec {
    /// Bounding box array in the display CRS
    ///
    /// The two corners are projected separately.
    pub fn to_bbox(&self, bbox: &BoundingBox, crs: &str) -> Result<String> {
        let frame = self.frame(crs)?;
        Ok(write_bbox(
            frame.project(bbox.sw)?,
            frame.project(bbox.ne)?,
            frame.decimals,
        ))
    }

    /// Rectangle ring from a bounding box array in the given CRS
    ///
    /// Every vertex is reprojected to EPSG:4326 on its own, so in a projected
    /// CRS the result is the exact preimage of the rectangle's corners.
    pub fn from_bbox(&self, text: &str, crs: &str) -> Result<Ring> {
        let frame = self.frame(crs)?;
        let corners = expand_bbox(parse_bbox(text)?);
        Ring::new(frame.unproject_all(&corners)?)
    }
}
