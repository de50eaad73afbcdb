//! Projection adapter between EPSG:4326 and registered reference systems
//!
//! A [`CrsRegistry`] maps CRS identifiers such as `"EPSG:32633"` to a [`Projection`],
//! which knows how to go from geographic lng/lat to its own coordinates and back.
//! Every transform is routed through EPSG:4326, so two registered projected systems
//! can also be converted into each other.

mod utm;
mod web_mercator;

pub use utm::Utm;
pub use web_mercator::WebMercator;

use crate::{CodecError, Result};
use geo::Coord;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Canonical geographic CRS all geometry is stored in
pub const EPSG_4326: &str = "EPSG:4326";

/// UTM zone 33N, registered by default
pub const EPSG_32633: &str = "EPSG:32633";

/// Web Mercator, registered by default
pub const EPSG_3857: &str = "EPSG:3857";

/// A coordinate transform to and from EPSG:4326 (lng, lat order)
pub trait Projection: Send + Sync + fmt::Debug {
    /// Geographic (lng, lat) in degrees to this CRS
    fn forward(&self, geographic: Coord<f64>) -> Result<Coord<f64>>;

    /// This CRS back to geographic (lng, lat) in degrees
    fn inverse(&self, projected: Coord<f64>) -> Result<Coord<f64>>;

    /// Whether coordinates are angular degrees (drives display precision)
    fn is_geographic(&self) -> bool {
        false
    }
}

/// EPSG:4326 itself
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Projection for Geographic {
    #[inline]
    fn forward(&self, geographic: Coord<f64>) -> Result<Coord<f64>> {
        Ok(geographic)
    }

    #[inline]
    fn inverse(&self, projected: Coord<f64>) -> Result<Coord<f64>> {
        Ok(projected)
    }

    fn is_geographic(&self) -> bool {
        true
    }
}

type TransformFn = Box<dyn Fn(Coord<f64>) -> Option<Coord<f64>> + Send + Sync>;

/// Projection built from a pair of injected transform functions
///
/// A `None` result from either function is reported as a projection error.
pub struct FnProjection {
    name: String,
    forward: TransformFn,
    inverse: TransformFn,
    geographic: bool,
}

impl FnProjection {
    pub fn new<F, I>(name: impl Into<String>, forward: F, inverse: I) -> Self
    where
        F: Fn(Coord<f64>) -> Option<Coord<f64>> + Send + Sync + 'static,
        I: Fn(Coord<f64>) -> Option<Coord<f64>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            forward: Box::new(forward),
            inverse: Box::new(inverse),
            geographic: false,
        }
    }

    /// Mark the projection output as angular degrees
    pub fn geographic(mut self) -> Self {
        self.geographic = true;
        self
    }
}

impl fmt::Debug for FnProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProjection")
            .field("name", &self.name)
            .field("geographic", &self.geographic)
            .finish_non_exhaustive()
    }
}

impl Projection for FnProjection {
    fn forward(&self, geographic: Coord<f64>) -> Result<Coord<f64>> {
        (self.forward)(geographic).ok_or_else(|| {
            CodecError::Projection(format!(
                "{}: forward transform failed for ({}, {})",
                self.name, geographic.x, geographic.y
            ))
        })
    }

    fn inverse(&self, projected: Coord<f64>) -> Result<Coord<f64>> {
        (self.inverse)(projected).ok_or_else(|| {
            CodecError::Projection(format!(
                "{}: inverse transform failed for ({}, {})",
                self.name, projected.x, projected.y
            ))
        })
    }

    fn is_geographic(&self) -> bool {
        self.geographic
    }
}

/// Lookup table of registered reference systems
#[derive(Clone, Debug)]
pub struct CrsRegistry {
    projections: HashMap<String, Arc<dyn Projection>>,
}

impl Default for CrsRegistry {
    /// EPSG:4326, EPSG:32633 (UTM 33N) and EPSG:3857
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_utm(33, true);
        registry.register(EPSG_3857, Arc::new(WebMercator));
        registry
    }
}

impl CrsRegistry {
    /// Registry that only knows EPSG:4326
    pub fn empty() -> Self {
        let mut projections: HashMap<String, Arc<dyn Projection>> = HashMap::new();
        projections.insert(EPSG_4326.to_string(), Arc::new(Geographic));
        Self { projections }
    }

    /// Register (or replace) the projection for a CRS identifier
    pub fn register(&mut self, id: &str, projection: Arc<dyn Projection>) {
        let key = normalize_id(id);
        tracing::debug!("Registering CRS {key}: {projection:?}");
        self.projections.insert(key, projection);
    }

    /// Register a UTM zone as `EPSG:326zz` (north) or `EPSG:327zz` (south)
    pub fn register_utm(&mut self, zone: u8, north: bool) -> String {
        let utm = Utm::new(zone, north);
        let id = utm.epsg_id();
        self.register(&id, Arc::new(utm));
        id
    }

    /// Whether the identifier is registered
    pub fn contains(&self, id: &str) -> bool {
        self.projections.contains_key(&normalize_id(id))
    }

    /// All registered identifiers, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.projections.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn get(&self, id: &str) -> Result<&Arc<dyn Projection>> {
        self.projections
            .get(&normalize_id(id))
            .ok_or_else(|| CodecError::UnknownCrs(id.to_string()))
    }

    /// Whether the CRS uses angular degrees
    pub fn is_geographic(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.is_geographic())
    }

    /// Transform a coordinate between two registered systems
    ///
    /// Identity when both identifiers name the same CRS. Fails with
    /// [`CodecError::UnknownCrs`] if either is unregistered and with
    /// [`CodecError::Projection`] if the result is not finite.
    pub fn transform(&self, from: &str, to: &str, coord: Coord<f64>) -> Result<Coord<f64>> {
        let source = self.get(from)?;
        let target = self.get(to)?;

        if normalize_id(from) == normalize_id(to) {
            return Ok(coord);
        }

        let geographic = source.inverse(coord)?;
        ensure_finite(from, geographic)?;
        let projected = target.forward(geographic)?;
        ensure_finite(to, projected)?;
        Ok(projected)
    }

    /// EPSG:4326 to the given CRS
    #[inline]
    pub fn to_crs(&self, crs: &str, coord: Coord<f64>) -> Result<Coord<f64>> {
        self.transform(EPSG_4326, crs, coord)
    }

    /// The given CRS to EPSG:4326
    #[inline]
    pub fn from_crs(&self, crs: &str, coord: Coord<f64>) -> Result<Coord<f64>> {
        self.transform(crs, EPSG_4326, coord)
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}

fn ensure_finite(crs: &str, coord: Coord<f64>) -> Result<()> {
    if coord.x.is_finite() && coord.y.is_finite() {
        Ok(())
    } else {
        Err(CodecError::Projection(format!(
            "transform through {crs} produced non-finite coordinate ({}, {})",
            coord.x, coord.y
        )))
    }
}
