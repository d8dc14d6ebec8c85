//! HTTP API handlers for polemark-reg

pub mod continuous;
pub mod health;
pub mod identifiers;
pub mod registration;

pub use continuous::continuous_routes;
pub use health::health_routes;
pub use identifiers::identifier_routes;
pub use registration::registration_routes;

use axum::http::Uri;

use crate::ApiError;

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
