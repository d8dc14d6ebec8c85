//! Coordinate extractors
//!
//! Registration photos may carry the position they were taken at. Extraction
//! is a narrow capability: raw image bytes in, optional coordinate out. The
//! routing decision and the HTTP layer only see [`CoordinateExtractor`], so the
//! decoder behind it can change (other containers, other metadata standards)
//! without touching them.
//!
//! A missing coordinate is the common case, not an error: screenshots,
//! re-encoded images and photos passed through sharing apps usually have their
//! metadata stripped.

pub mod exif_gps;

pub use exif_gps::{ExifCoordinateExtractor, GeoExtractionError};

use polemark_common::GeoCoordinate;

/// Capability: read an embedded coordinate from an image
pub trait CoordinateExtractor: Send + Sync {
    /// Extractor name for diagnostics
    fn name(&self) -> &'static str;

    /// Embedded coordinate, or `None` when absent or unreadable.
    ///
    /// Implementations never panic or propagate decode failures; the reason
    /// for a `None` goes to the debug log only.
    fn extract(&self, image: &[u8]) -> Option<GeoCoordinate>;
}

/// Extract a coordinate with the default EXIF extractor
pub fn extract_coordinate(image: &[u8]) -> Option<GeoCoordinate> {
    ExifCoordinateExtractor::new().extract(image)
}

// ============================================================================
// Mock Extractor for Testing
// ============================================================================
