use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::time;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the process started
    pub uptime: f64,
    /// `connected` or `disconnected`
    pub mongodb: String,
    pub timestamp: String,
    pub environment: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Process is up; reports database readiness", body = HealthResponse)
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "OK".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        mongodb: state.connection.status().as_str().to_string(),
        timestamp: time::to_rfc3339(time::now()),
        environment: state.config.environment.clone(),
    };
    (StatusCode::OK, Json(body))
}
