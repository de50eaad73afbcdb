//! Minimal WKB codec for single-ring polygons
//!
//! Layout (all multi-byte values in the byte order named by the flag):
//!
//! ```text
//! offset 0:  u8   byte order flag (1 = little-endian, always written)
//! offset 1:  u32  geometry type (3 = Polygon)
//! offset 5:  u32  ring count (1)
//! offset 9:  u32  point count N
//! offset 13: N x (f64 x, f64 y)
//! ```
//!
//! Only one outer ring is ever represented. Counts are written as full 4-byte
//! integers, so rings with 256 points or more encode correctly.

use crate::{CodecError, Result, Ring};
use geo::Coord;
use std::fmt::Write;

/// Byte order flag for little-endian (NDR)
pub const LITTLE_ENDIAN: u8 = 1;

/// Byte order flag for big-endian (XDR), accepted on decode only
pub const BIG_ENDIAN: u8 = 0;

/// WKB geometry type code for Polygon
pub const POLYGON_TYPE: u32 = 3;

/// Bytes before the first point
pub const HEADER_LEN: usize = 13;

/// Bytes per (x, y) point
pub const POINT_LEN: usize = 16;

/// Encode a ring as little-endian WKB
pub fn encode(ring: &Ring) -> Vec<u8> {
    let coords = ring.coords();
    let mut out = Vec::with_capacity(HEADER_LEN + coords.len() * POINT_LEN);

    out.push(LITTLE_ENDIAN);
    out.extend_from_slice(&POLYGON_TYPE.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(coords.len() as u32).to_le_bytes());
    for c in coords {
        out.extend_from_slice(&c.x.to_le_bytes());
        out.extend_from_slice(&c.y.to_le_bytes());
    }

    out
}

/// Decode WKB into the ring's coordinates
///
/// The point count is not validated against the polygon minimum here; callers
/// building a [`Ring`] do that.
pub fn decode(bytes: &[u8]) -> Result<Vec<Coord<f64>>> {
    let mut reader = Reader::new(bytes);

    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }

    let order = reader.u8()?;
    if order != LITTLE_ENDIAN && order != BIG_ENDIAN {
        return Err(CodecError::UnsupportedByteOrder(order));
    }
    reader.little_endian = order == LITTLE_ENDIAN;

    let geometry_type = reader.u32()?;
    if geometry_type != POLYGON_TYPE {
        return Err(CodecError::UnsupportedGeometryType(geometry_type));
    }

    let ring_count = reader.u32()?;
    if ring_count != 1 {
        return Err(CodecError::UnsupportedRingCount(ring_count));
    }

    let point_count = reader.u32()? as usize;
    let needed = point_count
        .checked_mul(POINT_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN))
        .unwrap_or(usize::MAX);
    if bytes.len() < needed {
        return Err(CodecError::Truncated {
            needed,
            available: bytes.len(),
        });
    }
    if bytes.len() > needed {
        tracing::debug!(
            "Ignoring {} trailing bytes after WKB polygon",
            bytes.len() - needed
        );
    }

    let mut coords = Vec::with_capacity(point_count);
    for _ in 0..point_count {
        let x = reader.f64()?;
        let y = reader.f64()?;
        coords.push(Coord { x, y });
    }

    Ok(coords)
}

/// Lowercase, zero-padded, two hex digits per byte
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Exact inverse of [`to_hex`]; accepts either letter case
pub fn from_hex(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(CodecError::InvalidHex(format!(
            "odd number of digits ({})",
            hex.len()
        )));
    }

    hex.as_bytes()
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| match (hex_value(pair[0]), hex_value(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(CodecError::InvalidHex(format!(
                "non-hex character near position {}",
                i * 2
            ))),
        })
        .collect()
}

/// Encode a ring straight to a hex string
pub fn encode_hex(ring: &Ring) -> String {
    to_hex(&encode(ring))
}

/// Decode a hex string straight to coordinates
pub fn decode_hex(hex: &str) -> Result<Vec<Coord<f64>>> {
    decode(&from_hex(hex)?)
}

#[inline]
fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Bounds-checked cursor over the input buffer
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    little_endian: bool,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            little_endian: true,
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.offset + N;
        let chunk = self
            .bytes
            .get(self.offset..end)
            .ok_or(CodecError::Truncated {
                needed: end,
                available: self.bytes.len(),
            })?;
        self.offset = end;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32> {
        let raw = self.take::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn f64(&mut self) -> Result<f64> {
        let raw = self.take::<8>()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ring() -> Ring {
        Ring::from_pairs(&[
            [8.80, 47.22],
            [8.82, 47.22],
            [8.82, 47.24],
            [8.80, 47.24],
            [8.80, 47.22],
        ])
        .unwrap()
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&sample_ring());
        assert_eq!(bytes.len(), HEADER_LEN + 5 * POINT_LEN);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..5], &[3, 0, 0, 0]);
        assert_eq!(&bytes[5..9], &[1, 0, 0, 0]);
        assert_eq!(&bytes[9..13], &[5, 0, 0, 0]);
        assert_eq!(&bytes[13..21], &8.80f64.to_le_bytes());
        assert_eq!(&bytes[21..29], &47.22f64.to_le_bytes());
    }

    #[test]
    fn test_roundtrip_is_bit_exact() {
        let ring = Ring::from_pairs(&[
            [0.1 + 0.2, -33.868_820_123_456_78],
            [151.209_295_999_999_9, f64::MIN_POSITIVE],
            [-179.999_999_999, 1e-300],
        ])
        .unwrap();
        let decoded = decode(&encode(&ring)).unwrap();
        for (a, b) in ring.coords().iter().zip(&decoded) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
        assert_eq!(decoded.len(), ring.len());
    }

    #[test]
    fn test_large_point_count_uses_all_four_bytes() {
        let pairs: Vec<[f64; 2]> = (0..300)
            .map(|i| {
                let angle = i as f64 / 300.0 * std::f64::consts::TAU;
                [8.8 + angle.cos() * 0.01, 47.2 + angle.sin() * 0.01]
            })
            .collect();
        let ring = Ring::from_pairs(&pairs).unwrap();
        let bytes = encode(&ring);
        assert_eq!(&bytes[9..13], &300u32.to_le_bytes());
        assert_eq!(decode(&bytes).unwrap().len(), 300);
    }

    #[test]
    fn test_hex_roundtrip_and_case() {
        let hex = to_hex(&[0x00, 0x0f, 0xa0, 0xff]);
        assert_eq!(hex, "000fa0ff");
        assert_eq!(from_hex(&hex).unwrap(), vec![0x00, 0x0f, 0xa0, 0xff]);
        assert_eq!(from_hex("000FA0FF").unwrap(), vec![0x00, 0x0f, 0xa0, 0xff]);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(from_hex("abc"), Err(CodecError::InvalidHex(_))));
        assert!(matches!(from_hex("zz00"), Err(CodecError::InvalidHex(_))));
    }

    #[test]
    fn test_unsupported_geometry_type() {
        let mut bytes = encode(&sample_ring());
        bytes[1] = 1; // Point
        assert_eq!(decode(&bytes), Err(CodecError::UnsupportedGeometryType(1)));
    }

    #[test]
    fn test_unsupported_ring_count() {
        let mut bytes = encode(&sample_ring());
        bytes[5] = 2;
        assert_eq!(decode(&bytes), Err(CodecError::UnsupportedRingCount(2)));
    }

    #[test]
    fn test_misaligned_header_is_a_typed_error() {
        // Byte order flag padded to four bytes shifts every field by three
        let hex = "0100000003000000010000000200000000000000000020400000000000004040000000000000204000000000000040400100000000000000";
        assert_eq!(
            decode_hex(hex),
            Err(CodecError::UnsupportedGeometryType(0x0300_0000))
        );
    }

    #[test]
    fn test_truncated_points() {
        let mut bytes = encode(&sample_ring());
        bytes[9..13].copy_from_slice(&10u32.to_le_bytes());
        bytes.truncate(HEADER_LEN + 2 * POINT_LEN);
        assert_eq!(
            decode(&bytes),
            Err(CodecError::Truncated {
                needed: HEADER_LEN + 10 * POINT_LEN,
                available: HEADER_LEN + 2 * POINT_LEN,
            })
        );
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(
            decode(&[1, 3, 0]),
            Err(CodecError::Truncated {
                needed: HEADER_LEN,
                available: 3,
            })
        );
    }

    #[test]
    fn test_big_endian_input() {
        let mut bytes = vec![BIG_ENDIAN];
        bytes.extend_from_slice(&POLYGON_TYPE.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&3u32.to_be_bytes());
        for v in [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        let coords = decode(&bytes).unwrap();
        assert_eq!(coords[2], Coord { x: 5.0, y: 6.0 });
    }

    #[test]
    fn test_unknown_byte_order() {
        let mut bytes = encode(&sample_ring());
        bytes[0] = 7;
        assert_eq!(decode(&bytes), Err(CodecError::UnsupportedByteOrder(7)));
    }
}
