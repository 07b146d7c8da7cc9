use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::user_dto::DiagnosticResponse, error::Result, utils::client_addr::ClientAddr, AppState,
};

/// Writes a diagnostic record on every call. Registered only when
/// diagnostics are enabled in the configuration.
#[utoipa::path(
    get,
    path = "/api/test",
    responses(
        (status = 200, description = "Diagnostic record written and read back", body = DiagnosticResponse),
        (status = 503, description = "Database not connected"),
        (status = 500, description = "Database operation failed")
    )
)]
#[axum::debug_handler]
pub async fn run_diagnostic(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
) -> Result<impl IntoResponse> {
    let service = state.user_service()?;
    let report = service
        .run_diagnostic(ip)
        .await
        .map_err(|e| e.during("Error en la operación de MongoDB"))?;
    Ok(Json(DiagnosticResponse::from(report)))
}
