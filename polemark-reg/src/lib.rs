//! polemark-reg library - pole registration assistant
//!
//! Serves the identifier engine (canonicalize, parse, predict), the
//! continuous-registration session and the photo-based duplicate routing
//! step over a local HTTP API.

use axum::{extract::DefaultBodyLimit, Router};
use polemark_common::config::RegistrationConfig;
use polemark_common::SessionStore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod extractors;
pub mod services;

pub use error::{ApiError, ApiResult};

use extractors::CoordinateExtractor;
use services::NearbyPoles;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Reads embedded coordinates from uploaded photos
    pub extractor: Arc<dyn CoordinateExtractor>,
    /// Registry lookup; `None` when no registry is configured
    pub nearby: Option<Arc<dyn NearbyPoles>>,
    /// Device-local "last registration" slot
    pub sessions: SessionStore,
    pub registration: RegistrationConfig,
    pub startup_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(
        extractor: Arc<dyn CoordinateExtractor>,
        nearby: Option<Arc<dyn NearbyPoles>>,
        sessions: SessionStore,
        registration: RegistrationConfig,
    ) -> Self {
        Self {
            extractor,
            nearby,
            sessions,
            registration,
            startup_time: Instant::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.registration.max_image_bytes;

    Router::new()
        .merge(api::identifier_routes())
        .merge(api::continuous_routes())
        .merge(api::registration_routes())
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
