//! Spherical Web Mercator (EPSG:3857)

use super::Projection;
use crate::{CodecError, Result};
use geo::Coord;
use std::f64::consts::{FRAC_PI_4, PI};

/// Sphere radius used by EPSG:3857 (WGS84 semi-major axis)
pub const SPHERE_RADIUS_M: f64 = 6_378_137.0;

/// Half of the projected world width, `PI * SPHERE_RADIUS_M`
pub const HALF_WORLD_M: f64 = PI * SPHERE_RADIUS_M;

/// Latitude at which the projected world becomes square
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Slack for projected coordinates landing a hair past the edge
const EDGE_TOLERANCE_M: f64 = 1e-3;

#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    /// Fails beyond [`MAX_LATITUDE`], where the projection has no finite square image
    fn forward(&self, geographic: Coord<f64>) -> Result<Coord<f64>> {
        let Coord { x: lng, y: lat } = geographic;
        if lat.abs() > MAX_LATITUDE {
            return Err(CodecError::Projection(format!(
                "latitude {lat} is outside the Web Mercator range (±{MAX_LATITUDE})"
            )));
        }
        Ok(Coord {
            x: SPHERE_RADIUS_M * lng.to_radians(),
            y: SPHERE_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
        })
    }

    fn inverse(&self, projected: Coord<f64>) -> Result<Coord<f64>> {
        if !is_valid_mercator(projected) {
            return Err(CodecError::Projection(format!(
                "({}, {}) is outside Web Mercator bounds",
                projected.x, projected.y
            )));
        }
        Ok(Coord {
            x: (projected.x / SPHERE_RADIUS_M).to_degrees(),
            y: (projected.y / SPHERE_RADIUS_M).sinh().atan().to_degrees(),
        })
    }
}

/// Whether a projected point lies inside the square world, give or take a millimeter
#[inline]
pub fn is_valid_mercator(c: Coord<f64>) -> bool {
    let limit = HALF_WORLD_M + EDGE_TOLERANCE_M;
    c.x.abs() <= limit && c.y.abs() <= limit
}
