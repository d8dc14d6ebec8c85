//! Nearby-pole lookup
//!
//! The registry that stores poles owns spatial indexing. This service only
//! asks it which poles lie within the duplicate-check radius of a photo's
//! coordinate so the contributor can confirm or reject a match.

use async_trait::async_trait;
use polemark_common::{DuplicateCheckRadius, GeoCoordinate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("polemark-reg/", env!("CARGO_PKG_VERSION"));

/// Nearby lookup errors
#[derive(Debug, Error)]
pub enum NearbyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Registry returned {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid registry URL: {0}")]
    InvalidUrl(String),
}

/// An existing pole close to the queried coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyCandidate {
    pub pole_id: String,
    #[serde(default)]
    pub identifiers: Vec<String>,
    pub coordinate: GeoCoordinate,
    /// Great-circle distance from the queried coordinate, meters
    #[serde(default)]
    pub distance_m: Option<f64>,
}

/// Capability: list poles already on record near a coordinate
#[async_trait]
pub trait NearbyPoles: Send + Sync {
    async fn find_nearby(
        &self,
        coordinate: GeoCoordinate,
        radius: DuplicateCheckRadius,
    ) -> Result<Vec<NearbyCandidate>, NearbyError>;
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    poles: Vec<NearbyCandidate>,
}

/// Registry client: `GET {base}/poles/nearby?lat=..&lng=..&radius_m=..`
pub struct HttpNearbyPoles {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpNearbyPoles {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NearbyError> {
        let base = base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(NearbyError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| NearbyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/poles/nearby", base),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NearbyPoles for HttpNearbyPoles {
    async fn find_nearby(
        &self,
        coordinate: GeoCoordinate,
        radius: DuplicateCheckRadius,
    ) -> Result<Vec<NearbyCandidate>, NearbyError> {
        let params = [
            ("lat", coordinate.latitude.to_string()),
            ("lng", coordinate.longitude.to_string()),
            ("radius_m", radius.meters().to_string()),
        ];

        tracing::debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            radius_m = radius.meters(),
            "Querying nearby poles"
        );

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| NearbyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NearbyError::Status(status.as_u16(), error_text));
        }

        let body: NearbyResponse = response
            .json()
            .await
            .map_err(|e| NearbyError::Parse(e.to_string()))?;

        let candidates = with_distances(coordinate, body.poles);
        tracing::info!(count = candidates.len(), "Nearby lookup complete");
        Ok(candidates)
    }
}

/// Fill in missing distances and order nearest first; ties keep registry order
fn with_distances(origin: GeoCoordinate, mut poles: Vec<NearbyCandidate>) -> Vec<NearbyCandidate> {
    for pole in &mut poles {
        if pole.distance_m.is_none() {
            pole.distance_m = Some(origin.distance_meters(&pole.coordinate));
        }
    }
    poles.sort_by(|a, b| {
        let a = a.distance_m.unwrap_or(f64::INFINITY);
        let b = b.distance_m.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    poles
}
