//! Continuous registration endpoints
//!
//! After a pole is registered its identifiers are kept in the session slot.
//! The next registration starts from predictions derived from them, so a
//! contributor walking a line of poles mostly confirms instead of typing.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use polemark_common::identifier::{continuous_candidates, SequenceCandidate};
use polemark_common::RegistrationSession;
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ContinuousResponse {
    pub session: Option<RegistrationSession>,
    pub candidates: Vec<SequenceCandidate>,
}

/// Completed registration as reported by the client
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRegistrationRequest {
    pub last_identifiers: Vec<String>,
    #[serde(default)]
    pub pole_type_category: String,
}

/// GET /api/continuous
///
/// Stored session plus predicted identifiers for the next pole.
pub async fn get_continuous(State(state): State<AppState>) -> ApiResult<Json<ContinuousResponse>> {
    let session = state.sessions.load()?;
    let candidates = session
        .as_ref()
        .map(|s| continuous_candidates(s, &state.registration.prediction_offsets))
        .unwrap_or_default();

    Ok(Json(ContinuousResponse {
        session,
        candidates,
    }))
}

/// PUT /api/continuous
///
/// Overwrite the session slot with a just-completed registration.
pub async fn put_continuous(
    State(state): State<AppState>,
    payload: Result<Json<CompleteRegistrationRequest>, JsonRejection>,
) -> ApiResult<Json<RegistrationSession>> {
    let Json(request) = payload?;
    let session = state
        .sessions
        .record_completed(&request.last_identifiers, request.pole_type_category)?;
    tracing::info!(
        identifiers = session.last_identifiers.len(),
        category = %session.pole_type_category,
        "Registration session updated"
    );

    Ok(Json(session))
}

/// DELETE /api/continuous
pub async fn delete_continuous(State(state): State<AppState>) -> ApiResult<StatusCode> {
    if state.sessions.clear()? {
        tracing::info!("Registration session cleared");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Build continuous registration routes
pub fn continuous_routes() -> Router<AppState> {
    Router::new().route(
        "/api/continuous",
        get(get_continuous)
            .put(put_continuous)
            .delete(delete_continuous),
    )
}
