//! OpenAPI description of the HTTP surface.

use axum::Json;
use utoipa::OpenApi;

use crate::dto::user_dto::{
    ClearUsersResponse, CreateUserPayload, CreateUserResponse, DiagnosticResponse,
    DiagnosticStats, Pagination, UserListResponse, UserResponse,
};
use crate::routes::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::diagnostic::run_diagnostic,
        crate::routes::usuarios::list_users,
        crate::routes::usuarios::create_user,
        crate::routes::usuarios::clear_users,
    ),
    components(schemas(
        HealthResponse,
        CreateUserPayload,
        UserResponse,
        Pagination,
        UserListResponse,
        CreateUserResponse,
        DiagnosticStats,
        DiagnosticResponse,
        ClearUsersResponse,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
