//! geopoints service library
//!
//! HTTP handlers and router for the GeoJSON points service.
//! This library is used by both the geopoints-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use geopoints::PointsService;

/// Application state shared across handlers.
pub struct AppState {
    /// Service that loads the feature collection.
    pub points_service: PointsService,
}

/// Build the application router without middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/points/geojson", get(handlers::get_points_geojson))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::ErrorResponse;
