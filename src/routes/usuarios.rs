use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::user_dto::{
        ClearUsersResponse, CreateUserPayload, CreateUserResponse, ListUsersQuery,
        UserListResponse,
    },
    error::{Error, Result},
    services::user_service::NewUser,
    utils::client_addr::ClientAddr,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/usuarios",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users, newest first", body = UserListResponse),
        (status = 503, description = "Database not connected"),
        (status = 500, description = "Database operation failed")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    pairs: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let service = state.user_service()?;
    let query = match pairs {
        Ok(Query(pairs)) => ListUsersQuery::from_pairs(pairs),
        Err(_) => ListUsersQuery::default(),
    };
    let page = service
        .list(query.page())
        .await
        .map_err(|e| e.during("Error al obtener usuarios"))?;
    Ok(Json(UserListResponse::from(page)))
}

#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "nombre or email missing"),
        (status = 413, description = "Body over the size limit"),
        (status = 503, description = "Database not connected"),
        (status = 500, description = "Database operation failed")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    ClientAddr(ip): ClientAddr,
    payload: std::result::Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let service = state.user_service()?;
    let Json(payload) = payload.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge(rejection.body_text()),
        _ => Error::BadRequest(rejection.body_text()),
    })?;
    payload.validate()?;

    let new_user = NewUser {
        nombre: payload.nombre.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        carrera: payload.carrera,
        ip,
    };
    let record = service
        .create(new_user)
        .await
        .map_err(|e| e.during("Error al crear usuario"))?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse::from(record))))
}

#[utoipa::path(
    delete,
    path = "/api/usuarios/limpiar",
    responses(
        (status = 200, description = "Collection emptied", body = ClearUsersResponse),
        (status = 403, description = "Not allowed in production"),
        (status = 503, description = "Database not connected"),
        (status = 500, description = "Database operation failed")
    )
)]
#[axum::debug_handler]
pub async fn clear_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let service = state.user_service()?;
    if state.config.is_production() {
        return Err(Error::Forbidden(
            "Operación no permitida en producción".to_string(),
        ));
    }

    let deleted = service
        .clear()
        .await
        .map_err(|e| e.during("Error al limpiar colección"))?;
    Ok(Json(ClearUsersResponse::new(deleted)))
}
