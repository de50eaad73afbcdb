//! Geometry values handled by the codec
//!
//! Every value here is in EPSG:4326 with `x = longitude` and `y = latitude`.
//! Projected coordinates never live in these types; they only appear as text
//! produced or consumed at the format boundary.

use crate::{CodecError, Result};
use geo::{Coord, LineString, Polygon, Rect};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of points a polygon ring needs to be accepted
pub const MIN_RING_POINTS: usize = 3;

/// Single outer boundary of a polygon, no holes
///
/// The ring may be open or explicitly closed (first == last); it is stored as given
/// so binary round trips stay bit-exact. Text formats that require closure close it
/// on output with [`Ring::closed_coords`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "use-serde", serde(try_from = "Vec<Coord<f64>>"))]
pub struct Ring(Vec<Coord<f64>>);

impl TryFrom<Vec<Coord<f64>>> for Ring {
    type Error = CodecError;

    fn try_from(coords: Vec<Coord<f64>>) -> Result<Self> {
        Ring::new(coords)
    }
}

impl Ring {
    /// Create a ring, validating point count and finiteness
    pub fn new(coords: Vec<Coord<f64>>) -> Result<Self> {
        if coords.len() < MIN_RING_POINTS {
            return Err(CodecError::InvalidRing(format!(
                "a polygon needs at least {MIN_RING_POINTS} points, got {}",
                coords.len()
            )));
        }
        if let Some(bad) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(CodecError::InvalidRing(format!(
                "non-finite coordinate ({}, {})",
                bad.x, bad.y
            )));
        }
        Ok(Self(coords))
    }

    /// Create a ring from `[x, y]` pairs
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(pairs.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    /// The coordinates exactly as stored
    #[inline]
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.0
    }

    /// Number of stored points (including the closing point if present)
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ring has no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the last point repeats the first
    pub fn is_closed(&self) -> bool {
        self.0.first() == self.0.last()
    }

    /// The coordinates with the first point repeated at the end if the ring is open
    pub fn closed_coords(&self) -> Vec<Coord<f64>> {
        let mut coords = self.0.clone();
        if !self.is_closed() {
            coords.push(self.0[0]);
        }
        coords
    }

    /// Consume the ring, returning its coordinates
    pub fn into_inner(self) -> Vec<Coord<f64>> {
        self.0
    }

    /// Convert to a `geo` polygon without interior rings
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::new(self.closed_coords()), Vec::new())
    }
}

/// Circle given by its center and a ground radius in meters
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct Circle {
    pub center: Coord<f64>,
    /// Radius in meters (ground distance, not CRS units)
    pub radius_m: f64,
}

impl Circle {
    pub fn new(center: Coord<f64>, radius_m: f64) -> Self {
        Self { center, radius_m }
    }
}

/// Single point marker
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct Marker {
    pub position: Coord<f64>,
}

impl Marker {
    pub fn new(position: Coord<f64>) -> Self {
        Self { position }
    }
}

/// Axis-aligned box given by its southwest and northeast corners
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub sw: Coord<f64>,
    pub ne: Coord<f64>,
}

impl BoundingBox {
    /// Create a box from any two opposite corners
    pub fn new(a: Coord<f64>, b: Coord<f64>) -> Self {
        Self {
            sw: Coord {
                x: a.x.min(b.x),
                y: a.y.min(b.y),
            },
            ne: Coord {
                x: a.x.max(b.x),
                y: a.y.max(b.y),
            },
        }
    }

    /// Zero-area box at a single point
    pub fn point(c: Coord<f64>) -> Self {
        Self { sw: c, ne: c }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            sw: Coord {
                x: self.sw.x.min(other.sw.x),
                y: self.sw.y.min(other.sw.y),
            },
            ne: Coord {
                x: self.ne.x.max(other.ne.x),
                y: self.ne.y.max(other.ne.y),
            },
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.ne.x - self.sw.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ne.y - self.sw.y
    }

    /// Closed rectangle ring in the order SW, SE, NE, NW, SW
    pub fn to_ring_coords(&self) -> Vec<Coord<f64>> {
        vec![
            self.sw,
            Coord {
                x: self.ne.x,
                y: self.sw.y,
            },
            self.ne,
            Coord {
                x: self.sw.x,
                y: self.ne.y,
            },
            self.sw,
        ]
    }

    /// Closed rectangle ring (see [`BoundingBox::to_ring_coords`])
    pub fn to_ring(&self) -> Ring {
        Ring(self.to_ring_coords())
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            sw: rect.min(),
            ne: rect.max(),
        }
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(bbox.sw, bbox.ne)
    }
}

/// A shape selected by the user, dispatched on by the format codec
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub enum Geometry {
    Ring(Ring),
    Circle(Circle),
    Marker(Marker),
    BoundingBox(BoundingBox),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Ring(_) => GeometryKind::Ring,
            Geometry::Circle(_) => GeometryKind::Circle,
            Geometry::Marker(_) => GeometryKind::Marker,
            Geometry::BoundingBox(_) => GeometryKind::BoundingBox,
        }
    }
}

/// Geometry tag without payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub enum GeometryKind {
    Ring,
    Circle,
    Marker,
    BoundingBox,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 4] = [
        GeometryKind::Ring,
        GeometryKind::Circle,
        GeometryKind::Marker,
        GeometryKind::BoundingBox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Ring => "polygon",
            GeometryKind::Circle => "circle",
            GeometryKind::Marker => "marker",
            GeometryKind::BoundingBox => "bbox",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // Rectangles and polylines are drawn as rings
            "polygon" | "ring" | "rectangle" | "polyline" => Ok(GeometryKind::Ring),
            "circle" => Ok(GeometryKind::Circle),
            "marker" | "point" => Ok(GeometryKind::Marker),
            "bbox" | "boundingbox" => Ok(GeometryKind::BoundingBox),
            other => Err(format!("unknown geometry kind '{other}'")),
        }
    }
}
