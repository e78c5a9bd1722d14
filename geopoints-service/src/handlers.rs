//! HTTP request handlers for the points service.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use geopoints::PointsError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

/// Error response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Get every point in the backing table as a GeoJSON feature collection.
///
/// # Returns
///
/// - `200 OK` with the feature collection on success. An empty result is an
///   empty collection.
/// - `500 Internal Server Error` if the query, row scan or decode fails
#[axum::debug_handler]
pub async fn get_points_geojson(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.points_service.feature_collection().await {
        Ok(collection) => {
            tracing::debug!(features = collection.features().len(), "Feature collection loaded");
            (StatusCode::OK, Json(collection)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Log the failure and map it to a 500 with a fixed message.
fn error_response(e: PointsError) -> axum::response::Response {
    tracing::error!(error = %e, "{}", e.public_message());

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.public_message().to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialize() {
        let response = ErrorResponse {
            error: "Failed to query points".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"error":"Failed to query points"}"#);
    }

    #[test]
    fn test_error_response_status() {
        let decode_err = serde_json::from_slice::<serde_json::Value>(b"").unwrap_err();
        let response = error_response(PointsError::Unmarshal(decode_err));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
