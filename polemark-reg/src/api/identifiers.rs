//! Identifier engine endpoints
//!
//! Every handler canonicalizes its input first, so clients may send
//! identifiers exactly as typed.

use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use polemark_common::identifier::{self, PrefixShape};
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CanonicalizeRequest {
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct CanonicalizeResponse {
    pub canonical: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub identifier: String,
}

/// Structure of one identifier; fields are null when not recognised
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub canonical: String,
    pub prefix: Option<String>,
    pub shape: Option<PrefixShape>,
    pub suffix: Option<u64>,
    /// Digit count of the suffix as written
    pub suffix_width: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NextRequest {
    pub previous: String,
    #[serde(default = "default_delta")]
    pub delta: i64,
}

fn default_delta() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct NextResponse {
    pub next: Option<String>,
}

/// POST /api/identifiers/canonicalize
pub async fn canonicalize(
    payload: Result<Json<CanonicalizeRequest>, JsonRejection>,
) -> ApiResult<Json<CanonicalizeResponse>> {
    let Json(request) = payload?;
    Ok(Json(CanonicalizeResponse {
        canonical: identifier::canonicalize(&request.raw),
    }))
}

/// POST /api/identifiers/parse
pub async fn parse(
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> ApiResult<Json<ParseResponse>> {
    let Json(request) = payload?;
    let canonical = identifier::canonicalize(&request.identifier);
    let matched = identifier::match_prefix(&canonical);
    let digits = identifier::suffix_digits(&canonical);

    Ok(Json(ParseResponse {
        prefix: matched.as_ref().map(|m| m.prefix.to_string()),
        shape: matched.map(|m| m.shape),
        suffix: identifier::parse_suffix(&canonical),
        suffix_width: digits.map(str::len),
        canonical,
    }))
}

/// POST /api/identifiers/next
pub async fn next(
    payload: Result<Json<NextRequest>, JsonRejection>,
) -> ApiResult<Json<NextResponse>> {
    let Json(request) = payload?;
    let previous = identifier::canonicalize(&request.previous);
    let next = identifier::next_identifier(&previous, request.delta);

    if next.is_none() {
        tracing::debug!(previous = %previous, delta = request.delta, "Identifier not predictable");
    }

    Ok(Json(NextResponse { next }))
}

/// Build identifier routes
pub fn identifier_routes() -> Router<AppState> {
    Router::new()
        .route("/api/identifiers/canonicalize", post(canonicalize))
        .route("/api/identifiers/parse", post(parse))
        .route("/api/identifiers/next", post(next))
}
