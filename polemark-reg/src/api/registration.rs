//! Photo-based registration routing
//!
//! A new registration starts from a photo. If the photo carries a position
//! the client is sent to the proximity check, listing poles already on record
//! within the duplicate-check radius; otherwise the contributor enters the
//! location by hand.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    routing::post,
    Json, Router,
};
use polemark_common::{route, RouteDecision};
use serde::Serialize;
use uuid::Uuid;

use crate::services::NearbyCandidate;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct LocateResponse {
    pub attempt_id: Uuid,
    pub decision: RouteDecision,
    /// Poles on record near the photo; null on the manual branch or when
    /// the registry is unavailable
    pub nearby: Option<Vec<NearbyCandidate>>,
}

/// POST /api/registration/locate
///
/// Body is the raw image.
pub async fn locate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<LocateResponse>> {
    let image = body?;
    if image.is_empty() {
        return Err(ApiError::BadRequest("Image body is empty".to_string()));
    }

    let attempt_id = Uuid::new_v4();
    let extractor = state.extractor.clone();
    let bytes = image.len();

    // EXIF decode is synchronous and proportional to image size
    let coordinate = tokio::task::spawn_blocking(move || extractor.extract(&image))
        .await
        .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))?;

    let decision = route(coordinate);
    tracing::info!(
        attempt_id = %attempt_id,
        bytes,
        extractor = state.extractor.name(),
        located = decision.coordinate().is_some(),
        "Registration routed"
    );

    let nearby = match (&decision, &state.nearby) {
        (RouteDecision::ProximityCheck { coordinate }, Some(lookup)) => {
            let radius = state.registration.duplicate_check_radius_m;
            match lookup.find_nearby(*coordinate, radius).await {
                Ok(candidates) => Some(candidates),
                Err(e) => {
                    tracing::warn!(attempt_id = %attempt_id, error = %e, "Nearby lookup failed");
                    None
                }
            }
        }
        _ => None,
    };

    Ok(Json(LocateResponse {
        attempt_id,
        decision,
        nearby,
    }))
}

/// Build registration routes
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/api/registration/locate", post(locate))
}
