//! Shape Codec Library - Coordinate Formats for Drawn Map Shapes
//!
//! This library converts the shapes a user draws on a web map (polygons, rectangles,
//! circles and markers) to and from the textual and binary formats people paste into
//! other GIS tools, reprojecting between EPSG:4326 and projected reference systems on
//! the way.
//!
//! # Architecture
//!
//! - **[`Geometry`]**: Tagged union over [`Ring`], [`Circle`], [`Marker`] and [`BoundingBox`]
//! - **[`CrsRegistry`]**: Projection adapter, forward/inverse transforms keyed by CRS id
//! - **[`wkb`]**: Fixed little-endian single-ring polygon WKB with hex helpers
//! - **[`ShapeCodec`]**: Format codec (GeoJSON, WKT, WKB, Leaflet, bbox, circle text)
//! - **[`union_bounds`]**: Union bounding box over a set of shapes
//!
//! All geometry is stored in EPSG:4326 with `x = longitude`, `y = latitude`. Other
//! reference systems only exist at the codec boundary.
//!
//! # Example
//!
//! ```
//! use shape_codec_lib::{Format, Geometry, Ring, ShapeCodec};
//!
//! let ring = Ring::from_pairs(&[[8.80, 47.22], [8.82, 47.22], [8.82, 47.24]]).unwrap();
//! let codec = ShapeCodec::default();
//! let wkt = codec.encode(&Geometry::Ring(ring), Format::Wkt, "EPSG:4326").unwrap();
//! assert!(wkt.starts_with("POLYGON((8.800000 47.220000,"));
//! ```

mod bounds;
pub mod format;
mod geometry;
pub mod measure;
pub mod projection;
pub mod wkb;

// Public API exports
pub use bounds::{bounds_of, union_bounds};
pub use format::{CodecConfig, Format, MAX_DECIMALS, ShapeCodec, supported_formats};
pub use geometry::{BoundingBox, Circle, Geometry, GeometryKind, Marker, Ring};
pub use projection::{CrsRegistry, EPSG_4326, EPSG_32633, Projection};

/// Error types for the codec layer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Unsupported WKB byte order flag {0}")]
    UnsupportedByteOrder(u8),

    #[error("Unsupported WKB geometry type {0} (only Polygon = 3 is supported)")]
    UnsupportedGeometryType(u32),

    #[error("Unsupported WKB ring count {0} (only single ring polygons are supported)")]
    UnsupportedRingCount(u32),

    #[error("Truncated WKB: needed {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Invalid WKT: {0}")]
    InvalidWkt(String),

    #[error("Invalid coordinate pair: {0}")]
    InvalidCoordinatePair(String),

    #[error("Invalid BBox: {0}")]
    InvalidBBox(String),

    #[error("Invalid circle format: {0}")]
    InvalidCircleFormat(String),

    #[error("Invalid ring: {0}")]
    InvalidRing(String),

    #[error("Format {format} is not available for {kind} geometries")]
    UnsupportedFormat { format: Format, kind: GeometryKind },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("No shapes drawn")]
    NoShapes,
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn() -> ShapeCodec = ShapeCodec::default;
        let _: fn() -> CrsRegistry = CrsRegistry::default;
        let _: fn(&[Geometry]) -> Result<BoundingBox> = union_bounds;
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = CodecError::Truncated {
            needed: 173,
            available: 45,
        };
        assert_eq!(err.to_string(), "Truncated WKB: needed 173 bytes, got 45");

        let err = CodecError::UnsupportedFormat {
            format: Format::Wkb,
            kind: GeometryKind::Circle,
        };
        assert_eq!(
            err.to_string(),
            "Format wkb is not available for circle geometries"
        );
    }
}
