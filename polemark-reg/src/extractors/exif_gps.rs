//! EXIF GPS coordinate extractor
//!
//! Reads GPSLatitude/GPSLongitude (degrees, minutes, seconds as rationals)
//! and their N/S, E/W references from the primary image's EXIF block.
//! Supported containers are the ones `kamadak-exif` understands: JPEG, TIFF,
//! HEIF, PNG and WebP.

use exif::{In, Reader, Tag, Value};
use polemark_common::GeoCoordinate;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use super::CoordinateExtractor;

/// Containers that can carry EXIF and are decodable here
const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/tiff",
    "image/heif",
    "image/avif",
    "image/png",
    "image/webp",
];

/// Why no coordinate could be read. Diagnostic only.
#[derive(Debug, Error)]
pub enum GeoExtractionError {
    #[error("Unrecognised container")]
    UnrecognisedContainer,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(&'static str),

    #[error("EXIF decode failed: {0}")]
    Metadata(#[from] exif::Error),

    #[error("Missing GPS tag {0}")]
    MissingTag(Tag),

    #[error("Malformed GPS tag {0}")]
    MalformedTag(Tag),

    #[error("Coordinate out of range: {latitude}, {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },

    /// 0,0 is written by some apps when the receiver had no fix
    #[error("Zero coordinate (no GPS fix)")]
    NoFix,
}

/// Coordinate extractor backed by EXIF GPS tags
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifCoordinateExtractor;

impl ExifCoordinateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Like [`CoordinateExtractor::extract`] but keeps the failure reason
    pub fn try_extract(&self, image: &[u8]) -> Result<GeoCoordinate, GeoExtractionError> {
        let kind = infer::get(image).ok_or(GeoExtractionError::UnrecognisedContainer)?;
        let mime = kind.mime_type();
        if !SUPPORTED_MIME_TYPES.contains(&mime) {
            return Err(GeoExtractionError::UnsupportedFormat(mime));
        }

        let exif = Reader::new().read_from_container(&mut Cursor::new(image))?;

        let latitude = signed_degrees(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S')?;
        let longitude = signed_degrees(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W')?;

        if latitude == 0.0 && longitude == 0.0 {
            return Err(GeoExtractionError::NoFix);
        }

        GeoCoordinate::new(latitude, longitude)
            .ok_or(GeoExtractionError::OutOfRange { latitude, longitude })
    }
}

impl CoordinateExtractor for ExifCoordinateExtractor {
    fn name(&self) -> &'static str {
        "exif-gps"
    }

    fn extract(&self, image: &[u8]) -> Option<GeoCoordinate> {
        match self.try_extract(image) {
            Ok(coordinate) => {
                debug!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "Extracted GPS coordinate"
                );
                Some(coordinate)
            }
            Err(e) => {
                debug!(bytes = image.len(), reason = %e, "No GPS coordinate in image");
                None
            }
        }
    }
}

/// Decimal degrees from a DMS rational tag, negated when the ref tag equals `negative_ref`
fn signed_degrees(
    exif: &exif::Exif,
    value_tag: Tag,
    ref_tag: Tag,
    negative_ref: u8,
) -> Result<f64, GeoExtractionError> {
    let field = exif
        .get_field(value_tag, In::PRIMARY)
        .ok_or(GeoExtractionError::MissingTag(value_tag))?;
    let degrees = dms_to_degrees(&field.value).ok_or(GeoExtractionError::MalformedTag(value_tag))?;

    let reference = exif
        .get_field(ref_tag, In::PRIMARY)
        .ok_or(GeoExtractionError::MissingTag(ref_tag))?;
    let reference = match &reference.value {
        Value::Ascii(parts) => parts
            .first()
            .and_then(|p| p.first())
            .map(|b| b.to_ascii_uppercase()),
        _ => None,
    }
    .ok_or(GeoExtractionError::MalformedTag(ref_tag))?;

    Ok(if reference == negative_ref {
        -degrees
    } else {
        degrees
    })
}

/// Degrees + minutes/60 + seconds/3600; minutes and seconds may be omitted
fn dms_to_degrees(value: &Value) -> Option<f64> {
    let Value::Rational(parts) = value else {
        return None;
    };
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|r| r.denom == 0) {
        return None;
    }

    let degrees = parts
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(r, scale)| r.to_f64() / scale)
        .sum::<f64>();
    degrees.is_finite().then_some(degrees)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal little-endian TIFF whose IFD0 points at a GPS IFD holding
    /// latitude/longitude refs and DMS rationals.
    pub(crate) fn tiff_with_gps(
        lat_ref: u8,
        lat: [(u32, u32); 3],
        lon_ref: u8,
        lon: [(u32, u32); 3],
    ) -> Vec<u8> {
        fn entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
            buf.extend_from_slice(&tag.to_le_bytes());
            buf.extend_from_slice(&kind.to_le_bytes());
            buf.extend_from_slice(&count.to_le_bytes());
            buf.extend_from_slice(&value.to_le_bytes());
        }
        const ASCII: u16 = 2;
        const LONG: u16 = 4;
        const RATIONAL: u16 = 5;

        let mut buf = Vec::new();
        buf.extend_from_slice(b"II");
        buf.extend_from_slice(&42u16.to_le_bytes());
        buf.extend_from_slice(&8u32.to_le_bytes());

        // IFD0 at 8: GPS IFD pointer only
        buf.extend_from_slice(&1u16.to_le_bytes());
        entry(&mut buf, 0x8825, LONG, 1, 26);
        buf.extend_from_slice(&0u32.to_le_bytes());

        // GPS IFD at 26, rational data at 80 and 104
        buf.extend_from_slice(&4u16.to_le_bytes());
        entry(&mut buf, 0x0001, ASCII, 2, u32::from_le_bytes([lat_ref, 0, 0, 0]));
        entry(&mut buf, 0x0002, RATIONAL, 3, 80);
        entry(&mut buf, 0x0003, ASCII, 2, u32::from_le_bytes([lon_ref, 0, 0, 0]));
        entry(&mut buf, 0x0004, RATIONAL, 3, 104);
        buf.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(buf.len(), 80);

        for (num, denom) in lat.iter().chain(lon.iter()) {
            buf.extend_from_slice(&num.to_le_bytes());
            buf.extend_from_slice(&denom.to_le_bytes());
        }
        buf
    }

    /// Tokyo Station: 35°40'52.2"N 139°46'1.2"E
    pub(crate) fn tokyo_station_tiff() -> Vec<u8> {
        tiff_with_gps(
            b'N',
            [(35, 1), (40, 1), (522, 10)],
            b'E',
            [(139, 1), (46, 1), (12, 10)],
        )
    }

    /// TIFF with an empty IFD0 and no GPS block
    fn tiff_without_gps() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"II");
        buf.extend_from_slice(&42u16.to_le_bytes());
        buf.extend_from_slice(&8u32.to_le_bytes());
        // One harmless entry (Orientation = 1) so the IFD is not empty
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&0x0112u16.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf
    }

    #[test]
    fn test_extracts_north_east_coordinate() {
        let coordinate = ExifCoordinateExtractor::new()
            .extract(&tokyo_station_tiff())
            .unwrap();

        assert!((coordinate.latitude - 35.681_166_67).abs() < 1e-6);
        assert!((coordinate.longitude - 139.767).abs() < 1e-6);
    }

    #[test]
    fn test_south_west_refs_negate() {
        let image = tiff_with_gps(b'S', [(33, 1), (52, 1), (0, 1)], b'W', [(70, 1), (30, 1), (0, 1)]);
        let coordinate = ExifCoordinateExtractor::new().extract(&image).unwrap();

        assert!((coordinate.latitude + 33.866_666_67).abs() < 1e-6);
        assert!((coordinate.longitude + 70.5).abs() < 1e-6);
    }

    #[test]
    fn test_image_without_gps_is_none() {
        let extractor = ExifCoordinateExtractor::new();
        assert!(matches!(
            extractor.try_extract(&tiff_without_gps()),
            Err(GeoExtractionError::MissingTag(tag)) if tag == Tag::GPSLatitude
        ));
        assert_eq!(extractor.extract(&tiff_without_gps()), None);
    }

    #[test]
    fn test_jpeg_without_exif_is_none() {
        // SOI, a tiny APP0 segment, EOI
        let jpeg = [
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9,
        ];
        assert_eq!(ExifCoordinateExtractor::new().extract(&jpeg), None);
    }

    #[test]
    fn test_unsupported_format() {
        // GIF89a header
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        assert!(matches!(
            ExifCoordinateExtractor::new().try_extract(gif),
            Err(GeoExtractionError::UnsupportedFormat("image/gif"))
        ));
    }

    #[test]
    fn test_unrecognised_container() {
        assert!(matches!(
            ExifCoordinateExtractor::new().try_extract(b"hello"),
            Err(GeoExtractionError::UnrecognisedContainer)
        ));
    }

    #[test]
    fn test_zero_denominator_is_malformed() {
        let image = tiff_with_gps(b'N', [(35, 0), (0, 1), (0, 1)], b'E', [(139, 1), (0, 1), (0, 1)]);
        assert!(matches!(
            ExifCoordinateExtractor::new().try_extract(&image),
            Err(GeoExtractionError::MalformedTag(tag)) if tag == Tag::GPSLatitude
        ));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let image = tiff_with_gps(b'N', [(95, 1), (0, 1), (0, 1)], b'E', [(139, 1), (0, 1), (0, 1)]);
        assert!(matches!(
            ExifCoordinateExtractor::new().try_extract(&image),
            Err(GeoExtractionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_zero_zero_is_no_fix() {
        let zero = [(0, 1), (0, 1), (0, 1)];
        let image = tiff_with_gps(b'N', zero, b'E', zero);
        assert!(matches!(
            ExifCoordinateExtractor::new().try_extract(&image),
            Err(GeoExtractionError::NoFix)
        ));
    }

    #[test]
    fn test_dms_with_degrees_only() {
        let value = Value::Rational(vec![exif::Rational { num: 141, denom: 2 }]);
        assert_eq!(dms_to_degrees(&value), Some(70.5));
        assert_eq!(dms_to_degrees(&Value::Rational(vec![])), None);
        assert_eq!(dms_to_degrees(&Value::Byte(vec![1])), None);
    }
}
