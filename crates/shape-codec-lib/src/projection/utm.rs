//! Universal Transverse Mercator on the WGS84 ellipsoid
//!
//! Krüger series to third order in the third flattening `n`, which is accurate to
//! well under a millimetre inside a zone. Valid between 80°S and 84°N.

use super::Projection;
use crate::{CodecError, Result};
use geo::Coord;

/// WGS84 semi-major axis in meters
const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// UTM central scale factor
pub const UTM_K0: f64 = 0.9996;

/// False easting for every zone
const FALSE_EASTING: f64 = 500_000.0;

/// False northing for southern zones
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Latitude range covered by UTM (outside it UPS applies)
const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

/// Precomputed series coefficients, shared by every zone
#[derive(Debug, Clone, Copy)]
struct Series {
    /// Rectifying radius scaled by k0
    k0_a: f64,
    /// 2 * sqrt(n) / (1 + n), used for the conformal latitude
    e_factor: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
}

impl Series {
    fn wgs84() -> Self {
        let n = WGS84_F / (2.0 - WGS84_F);
        let n2 = n * n;
        let n3 = n2 * n;
        let a = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);

        Self {
            k0_a: UTM_K0 * a,
            e_factor: 2.0 * n.sqrt() / (1.0 + n),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
                n2 / 48.0 + n3 / 15.0,
                17.0 * n3 / 480.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
                56.0 * n3 / 15.0,
            ],
        }
    }
}

/// One UTM zone
#[derive(Debug, Clone, Copy)]
pub struct Utm {
    zone: u8,
    north: bool,
    central_meridian: f64,
    series: Series,
}

impl Utm {
    /// Create a zone projection; `zone` is clamped to 1..=60
    pub fn new(zone: u8, north: bool) -> Self {
        let zone = zone.clamp(1, 60);
        Self {
            zone,
            north,
            central_meridian: f64::from(zone) * 6.0 - 183.0,
            series: Series::wgs84(),
        }
    }

    /// Zone containing a longitude
    pub fn zone_for_longitude(lon: f64) -> u8 {
        let zone = ((lon + 180.0) / 6.0).floor() as i32 + 1;
        zone.clamp(1, 60) as u8
    }

    #[inline]
    pub fn zone(&self) -> u8 {
        self.zone
    }

    #[inline]
    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    /// `EPSG:326zz` for northern zones, `EPSG:327zz` for southern ones
    pub fn epsg_id(&self) -> String {
        let base = if self.north { 32600 } else { 32700 };
        format!("EPSG:{}", base + u32::from(self.zone))
    }

    #[inline]
    fn false_northing(&self) -> f64 {
        if self.north { 0.0 } else { FALSE_NORTHING_SOUTH }
    }
}

impl Projection for Utm {
    fn forward(&self, geographic: Coord<f64>) -> Result<Coord<f64>> {
        let (lon, lat) = (geographic.x, geographic.y);
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(CodecError::Projection(format!(
                "latitude {lat} out of UTM range ({MIN_LATITUDE}, {MAX_LATITUDE})"
            )));
        }

        let s = &self.series;
        let phi = lat.to_radians();
        let dlam = (lon - self.central_meridian).to_radians();

        // Conformal latitude
        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - s.e_factor * (s.e_factor * sin_phi).atanh()).sinh();
        let xi_p = t.atan2(dlam.cos());
        let eta_p = (dlam.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in s.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        Ok(Coord {
            x: FALSE_EASTING + s.k0_a * eta,
            y: self.false_northing() + s.k0_a * xi,
        })
    }

    fn inverse(&self, projected: Coord<f64>) -> Result<Coord<f64>> {
        let s = &self.series;
        let xi = (projected.y - self.false_northing()) / s.k0_a;
        let eta = (projected.x - FALSE_EASTING) / s.k0_a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in s.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, delta) in s.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += delta * (k * chi).sin();
        }
        let dlam = eta_p.sinh().atan2(xi_p.cos());

        let geographic = Coord {
            x: self.central_meridian + dlam.to_degrees(),
            y: phi.to_degrees(),
        };
        if !geographic.x.is_finite() || !geographic.y.is_finite() {
            return Err(CodecError::Projection(format!(
                "({}, {}) is outside UTM zone {}",
                projected.x, projected.y, self.zone
            )));
        }
        Ok(geographic)
    }
}
