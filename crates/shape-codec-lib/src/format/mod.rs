//! Format codec - textual and binary representations of drawn shapes
//!
//! [`ShapeCodec`] is the entry point the map UI talks to: it turns a selected
//! [`Geometry`] into a display string for a chosen [`Format`] and CRS, and parses
//! pasted text back into EPSG:4326 geometry.
//!
//! Each format lives in its own submodule with two layers:
//! - pure text functions working on coordinates already in the display CRS
//!   (e.g. [`wkt::write_polygon`], [`wkt::parse_polygon`])
//! - `ShapeCodec` methods that add reprojection and rounding on top
//!   (e.g. [`ShapeCodec::to_wkt`], [`ShapeCodec::from_wkt`])

pub mod bbox;
pub mod circle;
pub mod geojson;
pub mod leaflet;
pub mod wkt;

use crate::projection::{CrsRegistry, EPSG_4326};
use crate::{CodecError, Geometry, GeometryKind, Result, Ring, wkb};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported text/binary formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    GeoJson,
    Wkt,
    Wkb,
    Leaflet,
    BBox,
    Circle,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::GeoJson,
        Format::Wkt,
        Format::Wkb,
        Format::Leaflet,
        Format::BBox,
        Format::Circle,
    ];

    /// Stable lowercase identifier (used for option values)
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::GeoJson => "geojson",
            Format::Wkt => "wkt",
            Format::Wkb => "wkb",
            Format::Leaflet => "leaflet",
            Format::BBox => "bbox",
            Format::Circle => "circle",
        }
    }

    /// Human readable label (used for option text)
    pub fn label(&self) -> &'static str {
        match self {
            Format::GeoJson => "GeoJSON",
            Format::Wkt => "WKT",
            Format::Wkb => "WKB",
            Format::Leaflet => "Leaflet",
            Format::BBox => "BBox",
            Format::Circle => "Circle",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geojson" => Ok(Format::GeoJson),
            "wkt" => Ok(Format::Wkt),
            "wkb" => Ok(Format::Wkb),
            "leaflet" => Ok(Format::Leaflet),
            "bbox" => Ok(Format::BBox),
            "circle" | "circles" => Ok(Format::Circle),
            _ => Err(CodecError::UnknownFormat(s.to_string())),
        }
    }
}

/// Formats offered for a geometry kind, in display order
pub fn supported_formats(kind: GeometryKind) -> &'static [Format] {
    match kind {
        GeometryKind::Ring => &[Format::GeoJson, Format::Wkt, Format::Wkb, Format::Leaflet],
        GeometryKind::Circle => &[Format::Circle],
        GeometryKind::Marker => &[Format::GeoJson, Format::Leaflet],
        GeometryKind::BoundingBox => &[
            Format::BBox,
            Format::Wkt,
            Format::Wkb,
            Format::Leaflet,
            Format::GeoJson,
        ],
    }
}

/// Most decimal places written for any number; an `f64` carries no more
pub const MAX_DECIMALS: usize = 17;

/// Display precision settings
///
/// Precisions above [`MAX_DECIMALS`] are treated as [`MAX_DECIMALS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Decimal places for geographic CRSs (degrees)
    pub geographic_decimals: usize,
    /// Decimal places for projected CRSs (usually meters)
    pub projected_decimals: usize,
    /// Decimal places for circle radii in meters
    pub radius_decimals: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            geographic_decimals: 6,
            projected_decimals: 2,
            radius_decimals: 2,
        }
    }
}

impl CodecConfig {
    /// Use the same precision for every coordinate CRS
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        let decimals = decimals.min(MAX_DECIMALS);
        self.geographic_decimals = decimals;
        self.projected_decimals = decimals;
        self
    }
}

/// Encoder/decoder for drawn shapes, bound to a CRS registry and display precision
#[derive(Clone, Debug, Default)]
pub struct ShapeCodec {
    registry: CrsRegistry,
    config: CodecConfig,
}

impl ShapeCodec {
    pub fn new(registry: CrsRegistry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    #[inline]
    pub fn registry(&self) -> &CrsRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a geometry in the given format and display CRS
    ///
    /// WKB ignores `crs` and is always written in EPSG:4326.
    pub fn encode(&self, geometry: &Geometry, format: Format, crs: &str) -> Result<String> {
        let kind = geometry.kind();
        if !supported_formats(kind).contains(&format) {
            return Err(CodecError::UnsupportedFormat { format, kind });
        }

        let text = match format {
            Format::GeoJson => self.to_geojson(geometry, crs)?,
            Format::Wkt => self.to_wkt(geometry, crs)?,
            Format::Wkb => self.to_wkb(geometry)?,
            Format::Leaflet => self.to_leaflet(geometry, crs)?,
            Format::BBox => match geometry {
                Geometry::BoundingBox(bbox) => self.to_bbox(bbox, crs)?,
                _ => return Err(CodecError::UnsupportedFormat { format, kind }),
            },
            Format::Circle => match geometry {
                Geometry::Circle(circle) => self.to_circle_text(circle, crs)?,
                _ => return Err(CodecError::UnsupportedFormat { format, kind }),
            },
        };

        tracing::debug!("Encoded {kind} as {format} in {crs} ({} chars)", text.len());
        Ok(text)
    }

    /// Parse text in the given format and CRS back into EPSG:4326 geometry
    ///
    /// Circle text yields [`Geometry::Circle`]; every other format yields
    /// [`Geometry::Ring`]. On failure nothing is produced, so callers can leave
    /// their state untouched.
    pub fn decode(&self, text: &str, format: Format, crs: &str) -> Result<Geometry> {
        let result = match format {
            Format::Circle => self.from_circle_text(text, crs).map(Geometry::Circle),
            _ => self.decode_ring(text, format, crs).map(Geometry::Ring),
        };

        match &result {
            Ok(geometry) => tracing::debug!("Decoded {format} from {crs} into {}", geometry.kind()),
            Err(e) => tracing::warn!("Rejected {format} import in {crs}: {e}"),
        }
        result
    }

    /// Parse text in a polygon-capable format into an EPSG:4326 ring
    pub fn decode_ring(&self, text: &str, format: Format, crs: &str) -> Result<Ring> {
        match format {
            Format::GeoJson => self.from_geojson(text, crs),
            Format::Wkt => self.from_wkt(text, crs),
            Format::Wkb => {
                if !self.registry.is_geographic(crs)? {
                    tracing::debug!("WKB is always EPSG:4326, ignoring {crs}");
                }
                self.from_wkb(text)
            }
            Format::Leaflet => self.from_leaflet(text, crs),
            Format::BBox => self.from_bbox(text, crs),
            Format::Circle => Err(CodecError::UnsupportedFormat {
                format,
                kind: GeometryKind::Ring,
            }),
        }
    }

    /// WKB hex of a ring or bounding box rectangle, always in EPSG:4326
    pub fn to_wkb(&self, geometry: &Geometry) -> Result<String> {
        match geometry {
            Geometry::Ring(ring) => Ok(wkb::encode_hex(ring)),
            Geometry::BoundingBox(bbox) => Ok(wkb::encode_hex(&bbox.to_ring())),
            other => Err(CodecError::UnsupportedFormat {
                format: Format::Wkb,
                kind: other.kind(),
            }),
        }
    }

    /// Ring from WKB hex (EPSG:4326)
    pub fn from_wkb(&self, hex: &str) -> Result<Ring> {
        Ring::new(wkb::decode_hex(hex)?)
    }

    /// Display frame for a CRS: projection plus the matching precision
    pub(crate) fn frame<'a>(&'a self, crs: &'a str) -> Result<Frame<'a>> {
        let decimals = if self.registry.is_geographic(crs)? {
            self.config.geographic_decimals
        } else {
            self.config.projected_decimals
        };
        Ok(Frame {
            registry: &self.registry,
            crs,
            decimals,
        })
    }
}

/// Reprojection and rounding for one display CRS
pub(crate) struct Frame<'a> {
    registry: &'a CrsRegistry,
    crs: &'a str,
    pub decimals: usize,
}

impl Frame<'_> {
    /// EPSG:4326 to the display CRS, unrounded
    pub fn project(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        self.registry.transform(EPSG_4326, self.crs, c)
    }

    /// EPSG:4326 to the display CRS, rounded to the display precision
    pub fn project_rounded(&self, c: Coord<f64>) -> Result<Coord<f64>> {
        let p = self.project(c)?;
        Ok(Coord {
            x: round_to(p.x, self.decimals),
            y: round_to(p.y, self.decimals),
        })
    }

    pub fn project_all(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>> {
        coords.iter().map(|&c| self.project(c)).collect()
    }

    /// Display CRS back to EPSG:4326
    pub fn unproject_all(&self, coords: &[Coord<f64>]) -> Result<Vec<Coord<f64>>> {
        coords
            .iter()
            .map(|&c| self.registry.transform(self.crs, EPSG_4326, c))
            .collect()
    }
}

/// Fixed-point text with exactly `decimals` places, at most [`MAX_DECIMALS`]
#[inline]
pub fn fixed(value: f64, decimals: usize) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    format!("{value:.decimals$}")
}

/// Round to `decimals` places the same way the fixed-point text does
#[inline]
pub fn round_to(value: f64, decimals: usize) -> f64 {
    fixed(value, decimals).parse().unwrap_or(value)
}
