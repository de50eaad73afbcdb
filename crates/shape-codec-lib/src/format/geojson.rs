//! GeoJSON Polygon / Point features
//!
//! Output is compact JSON: a ring becomes a Polygon `Feature`, a bounding box a
//! `FeatureCollection` with one rectangle feature, a marker a Point `Feature`.
//! Input accepts a bare Polygon, a Feature wrapping one, or a FeatureCollection
//! whose first feature is one; only the outer ring is kept.

use super::ShapeCodec;
use crate::geometry::MIN_RING_POINTS;
use crate::{BoundingBox, CodecError, Format, Geometry, Result, Ring};
use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The subset of GeoJSON objects this codec reads and writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    FeatureCollection {
        features: Vec<GeoJson>,
    },
    Feature {
        #[serde(default)]
        properties: Option<Value>,
        geometry: Option<Box<GeoJson>>,
    },
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    Point {
        coordinates: Vec<f64>,
    },
}

impl GeoJson {
    /// Feature with empty properties
    pub fn feature(geometry: GeoJson) -> Self {
        GeoJson::Feature {
            properties: Some(Value::Object(serde_json::Map::new())),
            geometry: Some(Box::new(geometry)),
        }
    }

    /// Single-ring polygon from display coordinates, closed if needed
    pub fn polygon(coords: &[Coord<f64>]) -> Self {
        let mut ring: Vec<Vec<f64>> = coords.iter().map(|c| vec![c.x, c.y]).collect();
        if coords.first() != coords.last() {
            ring.push(ring[0].clone());
        }
        GeoJson::Polygon {
            coordinates: vec![ring],
        }
    }

    pub fn point(c: Coord<f64>) -> Self {
        GeoJson::Point {
            coordinates: vec![c.x, c.y],
        }
    }

    /// Compact JSON text
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CodecError::InvalidGeoJson(e.to_string()))
    }
}

/// Extract the outer ring of the polygon in a GeoJSON document
pub fn parse_ring(text: &str) -> Result<Vec<Coord<f64>>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CodecError::InvalidGeoJson(e.to_string()))?;
    let document = outer_document(value)?;

    let outer = polygon_rings(document)?
        .into_iter()
        .next()
        .ok_or_else(|| CodecError::InvalidGeoJson("polygon has no rings".to_string()))?;

    let coords = outer
        .iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(CodecError::InvalidGeoJson(format!(
                "position {position:?} needs at least two numbers"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    if coords.len() < MIN_RING_POINTS {
        return Err(CodecError::InvalidGeoJson(format!(
            "a polygon must have at least {MIN_RING_POINTS} points, got {}",
            coords.len()
        )));
    }
    Ok(coords)
}

/// The document to read a polygon from
///
/// A FeatureCollection is narrowed to its first member before typed decoding,
/// so later members may be of any GeoJSON type.
fn outer_document(mut value: Value) -> Result<GeoJson> {
    if value.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
        value = match value.get_mut("features").and_then(Value::as_array_mut) {
            Some(features) if !features.is_empty() => features.swap_remove(0),
            Some(_) => {
                return Err(CodecError::InvalidGeoJson(
                    "FeatureCollection is empty".to_string(),
                ));
            }
            None => {
                return Err(CodecError::InvalidGeoJson(
                    "FeatureCollection has no features array".to_string(),
                ));
            }
        };
        if value.get("type").and_then(Value::as_str) != Some("Feature") {
            return Err(CodecError::InvalidGeoJson(
                "FeatureCollection member is not a Feature".to_string(),
            ));
        }
    }
    serde_json::from_value(value).map_err(|e| CodecError::InvalidGeoJson(e.to_string()))
}

fn polygon_rings(document: GeoJson) -> Result<Vec<Vec<Vec<f64>>>> {
    match document {
        GeoJson::Polygon { coordinates } => Ok(coordinates),
        GeoJson::Feature {
            geometry: Some(geometry),
            ..
        } => match *geometry {
            GeoJson::Polygon { coordinates } => Ok(coordinates),
            _ => Err(CodecError::InvalidGeoJson(
                "feature geometry is not a Polygon".to_string(),
            )),
        },
        GeoJson::Feature { geometry: None, .. } => Err(CodecError::InvalidGeoJson(
            "feature has no geometry".to_string(),
        )),
        GeoJson::FeatureCollection { .. } => Err(CodecError::InvalidGeoJson(
            "nested FeatureCollection".to_string(),
        )),
        GeoJson::Point { .. } => Err(CodecError::InvalidGeoJson(
            "expected a Polygon, got a Point".to_string(),
        )),
    }
}

impl ShapeCodec {
    /// GeoJSON of a ring, bounding box or marker in the display CRS
    pub fn to_geojson(&self, geometry: &Geometry, crs: &str) -> Result<String> {
        let frame = self.frame(crs)?;
        let document = match geometry {
            Geometry::Ring(ring) => {
                let coords = ring
                    .coords()
                    .iter()
                    .map(|&c| frame.project_rounded(c))
                    .collect::<Result<Vec<_>>>()?;
                GeoJson::feature(GeoJson::polygon(&coords))
            }
            Geometry::BoundingBox(bbox) => {
                let rect = BoundingBox::new(
                    frame.project_rounded(bbox.sw)?,
                    frame.project_rounded(bbox.ne)?,
                );
                GeoJson::FeatureCollection {
                    features: vec![GeoJson::feature(GeoJson::polygon(&rect.to_ring_coords()))],
                }
            }
            Geometry::Marker(marker) => {
                GeoJson::feature(GeoJson::point(frame.project_rounded(marker.position)?))
            }
            Geometry::Circle(_) => {
                return Err(CodecError::UnsupportedFormat {
                    format: Format::GeoJson,
                    kind: geometry.kind(),
                });
            }
        };
        document.to_json()
    }

    /// Ring from GeoJSON in the given CRS, reprojected to EPSG:4326
    pub fn from_geojson(&self, text: &str, crs: &str) -> Result<Ring> {
        let frame = self.frame(crs)?;
        let coords = parse_ring(text)?;
        Ring::new(frame.unproject_all(&coords)?)
    }
}
