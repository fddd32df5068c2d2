//! Decoding of hex-encoded well-known-binary geometries.
//!
//! The result exports carry route geometries as WKB hex text. Only the
//! line-string layout is decoded here; blobs with the PostGIS extended
//! SRID flag are accepted and their SRID is skipped, since all data is
//! referenced to EPSG:4326 anyway.

use snafu::{ensure, Snafu};

use crate::primitives::Path;

/// WKB geometry type code for a line string
const LINE_STRING: u32 = 2;

/// PostGIS EWKB flag announcing a trailing SRID after the type code
const EWKB_SRID_FLAG: u32 = 0x2000_0000;

/// PostGIS EWKB flags for Z/M dimensions, which are not supported
const EWKB_DIMENSION_FLAGS: u32 = 0x8000_0000 | 0x4000_0000;

const COORDINATE_SIZE: usize = 2 * std::mem::size_of::<f64>();

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum WkbError {
    #[snafu(display("Geometry blob is not valid hex: {}", source))]
    MalformedHex { source: hex::FromHexError },

    #[snafu(display("Geometry blob ends unexpectedly at byte {}", at))]
    UnexpectedEnd { at: usize },

    #[snafu(display("Unrecognized byte-order flag: {}", flag))]
    UnknownByteOrder { flag: u8 },

    #[snafu(display("Unsupported geometry type code: {}", code))]
    UnsupportedGeometryType { code: u32 },

    #[snafu(display(
        "Blob declares {} coordinates but carries {} coordinate bytes",
        declared,
        actual
    ))]
    CoordinateCountMismatch { declared: usize, actual: usize },

    #[snafu(display("Line string without coordinates"))]
    EmptyLineString,
}

/// Decodes a hex-encoded WKB line string into a [`Path`].
///
/// Any failure maps to `None`: callers treat this as "no geometry available
/// for this row" and skip the row, they never abort a whole batch over it.
/// Decoding is pure, so results may be cached indefinitely.
pub fn decode_path(wkb_hex: &str) -> Option<Path> {
    try_decode_path(wkb_hex).ok()
}

/// Decodes a hex-encoded WKB line string, reporting the failure cause.
pub fn try_decode_path(wkb_hex: &str) -> Result<Path, WkbError> {
    let bytes = hex::decode(wkb_hex).map_err(|source| WkbError::MalformedHex { source })?;
    let mut reader = ByteReader::new(&bytes);

    let little_endian = match reader.read_u8()? {
        0 => false,
        1 => true,
        flag => return Err(WkbError::UnknownByteOrder { flag }),
    };

    let raw_type = reader.read_u32(little_endian)?;
    ensure!(
        raw_type & EWKB_DIMENSION_FLAGS == 0 && raw_type & !EWKB_SRID_FLAG == LINE_STRING,
        UnsupportedGeometryType {
            code: raw_type & !EWKB_SRID_FLAG
        }
    );

    if raw_type & EWKB_SRID_FLAG != 0 {
        reader.read_u32(little_endian)?; // SRID, fixed upstream
    }

    let declared = reader.read_u32(little_endian)? as usize;
    ensure!(declared > 0, EmptyLineString);
    ensure!(
        reader.remaining() == declared * COORDINATE_SIZE,
        CoordinateCountMismatch {
            declared,
            actual: reader.remaining()
        }
    );

    let mut coordinates = Vec::with_capacity(declared);
    for _ in 0..declared {
        let x = reader.read_f64(little_endian)?;
        let y = reader.read_f64(little_endian)?;
        coordinates.push((x, y).into());
    }

    Ok(Path::new_unchecked(coordinates))
}

struct ByteReader<'b> {
    bytes: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    fn new(bytes: &'b [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WkbError> {
        let end = self.position + N;
        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or(WkbError::UnexpectedEnd { at: self.position })?;
        self.position = end;

        let mut array = [0; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    fn read_u8(&mut self) -> Result<u8, WkbError> {
        Ok(self.take::<1>()?[0])
    }

    fn read_u32(&mut self, little_endian: bool) -> Result<u32, WkbError> {
        let bytes = self.take::<4>()?;
        Ok(if little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    fn read_f64(&mut self, little_endian: bool) -> Result<f64, WkbError> {
        let bytes = self.take::<8>()?;
        Ok(if little_endian {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Coordinate2D, PathAccess};

    fn encode(coordinates: &[(f64, f64)], little_endian: bool, srid: Option<u32>) -> String {
        let mut bytes = vec![u8::from(little_endian)];

        let type_code = LINE_STRING | if srid.is_some() { EWKB_SRID_FLAG } else { 0 };

        let push_u32 = |bytes: &mut Vec<u8>, value: u32| {
            if little_endian {
                bytes.extend_from_slice(&value.to_le_bytes());
            } else {
                bytes.extend_from_slice(&value.to_be_bytes());
            }
        };
        let push_f64 = |bytes: &mut Vec<u8>, value: f64| {
            if little_endian {
                bytes.extend_from_slice(&value.to_le_bytes());
            } else {
                bytes.extend_from_slice(&value.to_be_bytes());
            }
        };

        push_u32(&mut bytes, type_code);
        if let Some(srid) = srid {
            push_u32(&mut bytes, srid);
        }
        push_u32(&mut bytes, coordinates.len() as u32);
        for &(x, y) in coordinates {
            push_f64(&mut bytes, x);
            push_f64(&mut bytes, y);
        }

        hex::encode(bytes)
    }

    #[test]
    fn round_trip_little_endian() {
        let coordinates = [(18.0, 59.3), (18.1, 59.4), (18.1, 59.4)];
        let path = decode_path(&encode(&coordinates, true, None)).unwrap();

        let expected: Vec<Coordinate2D> = coordinates.iter().map(|&c| c.into()).collect();
        assert_eq!(path.coordinates(), expected.as_slice());
    }

    #[test]
    fn round_trip_big_endian() {
        let coordinates = [(-0.5, 51.5), (2.35, 48.85)];
        let path = decode_path(&encode(&coordinates, false, None)).unwrap();

        assert_eq!(path.coordinates()[1], (2.35, 48.85).into());
    }

    #[test]
    fn accepts_ewkb_srid() {
        let coordinates = [(18.0, 59.3), (18.1, 59.4)];
        let path = decode_path(&encode(&coordinates, true, Some(4326))).unwrap();

        assert_eq!(path.point_count(), 2);
    }

    #[test]
    fn empty_and_garbage_input_yield_none() {
        assert!(decode_path("").is_none());
        assert!(decode_path("not-hex!!").is_none());
        assert!(decode_path("0").is_none()); // odd length
    }

    #[test]
    fn rejects_unknown_byte_order() {
        let mut blob = encode(&[(0.0, 0.0)], true, None);
        blob.replace_range(0..2, "02");

        assert!(matches!(
            try_decode_path(&blob),
            Err(WkbError::UnknownByteOrder { flag: 2 })
        ));
    }

    #[test]
    fn rejects_non_linear_geometry() {
        // a WKB point: byte order + type 1 + one coordinate pair
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&18.0f64.to_le_bytes());
        bytes.extend_from_slice(&59.3f64.to_le_bytes());

        assert!(matches!(
            try_decode_path(&hex::encode(bytes)),
            Err(WkbError::UnsupportedGeometryType { code: 1 })
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let blob = encode(&[(18.0, 59.3), (18.1, 59.4)], true, None);
        let truncated = &blob[..blob.len() - 8];

        assert!(matches!(
            try_decode_path(truncated),
            Err(WkbError::CoordinateCountMismatch { declared: 2, .. })
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut blob = encode(&[(18.0, 59.3)], true, None);
        blob.push_str("00");

        assert!(try_decode_path(&blob).is_err());
    }

    #[test]
    fn rejects_empty_line_string() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        assert!(matches!(
            try_decode_path(&hex::encode(bytes)),
            Err(WkbError::EmptyLineString)
        ));
    }

    #[test]
    fn decoding_is_deterministic() {
        let blob = encode(&[(18.0, 59.3), (18.1, 59.4)], true, None);

        assert_eq!(decode_path(&blob), decode_path(&blob));
        assert_eq!(decode_path("junk"), decode_path("junk"));
    }
}
