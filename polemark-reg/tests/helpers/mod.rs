//! Shared fixtures for polemark-reg integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use polemark_common::config::RegistrationConfig;
use polemark_common::{DuplicateCheckRadius, GeoCoordinate, SessionStore};
use polemark_reg::extractors::{CoordinateExtractor, ExifCoordinateExtractor};
use polemark_reg::services::{NearbyCandidate, NearbyError, NearbyPoles};
use polemark_reg::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

/// Registry stub returning one pole at the queried coordinate
pub struct OnePoleRegistry;

#[async_trait]
impl NearbyPoles for OnePoleRegistry {
    async fn find_nearby(
        &self,
        coordinate: GeoCoordinate,
        _radius: DuplicateCheckRadius,
    ) -> Result<Vec<NearbyCandidate>, NearbyError> {
        Ok(vec![NearbyCandidate {
            pole_id: "pole-1".to_string(),
            identifiers: vec!["247エ714".to_string()],
            coordinate,
            distance_m: Some(0.0),
        }])
    }
}

/// Registry stub that is always unreachable
pub struct DownRegistry;

#[async_trait]
impl NearbyPoles for DownRegistry {
    async fn find_nearby(
        &self,
        _coordinate: GeoCoordinate,
        _radius: DuplicateCheckRadius,
    ) -> Result<Vec<NearbyCandidate>, NearbyError> {
        Err(NearbyError::Network("connection refused".to_string()))
    }
}

/// Router over a fresh temporary root folder
pub struct TestApp {
    pub router: axum::Router,
    pub sessions: SessionStore,
    _root: TempDir,
}

pub fn setup_app(nearby: Option<Arc<dyn NearbyPoles>>) -> TestApp {
    setup_app_with(nearby, RegistrationConfig::default())
}

pub fn setup_app_with(
    nearby: Option<Arc<dyn NearbyPoles>>,
    registration: RegistrationConfig,
) -> TestApp {
    let root = TempDir::new().unwrap();
    let sessions = SessionStore::in_root_folder(root.path());
    let extractor: Arc<dyn CoordinateExtractor> = Arc::new(ExifCoordinateExtractor::new());
    let state = AppState::new(extractor, nearby, sessions.clone(), registration);

    TestApp {
        router: build_router(state),
        sessions,
        _root: root,
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn image_request(bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/registration/locate")
        .header("content-type", "application/octet-stream")
        .body(Body::from(bytes))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Little-endian TIFF with a GPS IFD: 35°40'52.2"N 139°46'1.2"E
pub fn geotagged_tiff() -> Vec<u8> {
    fn entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&kind.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
    }

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());

    buf.extend_from_slice(&1u16.to_le_bytes());
    entry(&mut buf, 0x8825, 4, 1, 26);
    buf.extend_from_slice(&0u32.to_le_bytes());

    buf.extend_from_slice(&4u16.to_le_bytes());
    entry(&mut buf, 0x0001, 2, 2, u32::from(b'N'));
    entry(&mut buf, 0x0002, 5, 3, 80);
    entry(&mut buf, 0x0003, 2, 2, u32::from(b'E'));
    entry(&mut buf, 0x0004, 5, 3, 104);
    buf.extend_from_slice(&0u32.to_le_bytes());

    for (num, denom) in [(35u32, 1u32), (40, 1), (522, 10), (139, 1), (46, 1), (12, 10)] {
        buf.extend_from_slice(&num.to_le_bytes());
        buf.extend_from_slice(&denom.to_le_bytes());
    }
    buf
}

/// JPEG with no APP1/EXIF segment
pub fn plain_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9]
}
