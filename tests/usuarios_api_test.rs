mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;

use common::{app_with_store, config, connected_app, disconnected_app, send, InMemoryUserStore};

#[tokio::test]
async fn data_routes_answer_503_without_touching_the_store() {
    let store = Arc::new(InMemoryUserStore::default());
    let (app, connection) = disconnected_app(config("development"));
    connection.mark_failed("connection refused");
    // A store that shows up after the failure must stay unreachable.
    assert!(!connection.mark_connected(store.clone()));

    let body = json!({ "nombre": "Ana", "email": "ana@example.com" });
    for (method, uri, payload) in [
        ("GET", "/api/test", None),
        ("GET", "/api/usuarios", None),
        ("POST", "/api/usuarios", Some(body.clone())),
        ("DELETE", "/api/usuarios/limpiar", None),
    ] {
        let (status, resp) = send(&app, method, uri, payload).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{} {}", method, uri);
        assert_eq!(resp["error"], "Servicio no disponible");
        assert!(resp["message"].is_string());
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn unavailable_check_runs_before_validation_and_policy() {
    let (app, _connection) = disconnected_app(config("production"));

    let (status, _) = send(&app, "POST", "/api/usuarios", Some(json!({}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, "DELETE", "/api/usuarios/limpiar", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn create_rejects_empty_name_without_writing() {
    let (app, store) = connected_app("development");

    let (status, body) = send(
        &app,
        "POST",
        "/api/usuarios",
        Some(json!({ "nombre": "", "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Datos incompletos");
    assert_eq!(body["message"], "nombre y email son requeridos");
    assert_eq!(store.calls(), 0);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn create_rejects_missing_or_malformed_body() {
    let (app, store) = connected_app("development");

    let (status, _) = send(&app, "POST", "/api/usuarios", Some(json!({ "nombre": "Ana" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/api/usuarios", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Datos incompletos");

    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn create_then_list_shows_one_server_stamped_record() {
    let (app, store) = connected_app("development");
    let started = DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/usuarios",
        Some(json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "id": "client-chosen",
            "fechaCreacion": "2000-01-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["usuario"]["carrera"], "No especificada");
    let id = body["usuario"]["id"].as_str().unwrap().to_string();
    assert_ne!(id, "client-chosen");
    assert_eq!(id.len(), 24);

    let (status, body) = send(&app, "GET", "/api/usuarios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let usuarios = body["usuarios"].as_array().unwrap();
    assert_eq!(usuarios.len(), 1);
    assert_eq!(usuarios[0]["id"], id.as_str());
    assert_eq!(usuarios[0]["nombre"], "Ana");

    let created: DateTime<Utc> = usuarios[0]["fechaCreacion"].as_str().unwrap().parse().unwrap();
    assert!(created >= started);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn list_pages_newest_first_with_total() {
    let (app, _store) = connected_app("development");
    for i in 0..5 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/usuarios",
            Some(json!({ "nombre": format!("Usuario {}", i), "email": format!("u{}@example.com", i) })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/usuarios?limit=2&skip=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["skip"], 0);
    assert_eq!(body["pagination"]["returned"], 2);

    let usuarios = body["usuarios"].as_array().unwrap();
    assert_eq!(usuarios.len(), 2);
    assert_eq!(usuarios[0]["nombre"], "Usuario 4");
    assert_eq!(usuarios[1]["nombre"], "Usuario 3");
    let first: DateTime<Utc> = usuarios[0]["fechaCreacion"].as_str().unwrap().parse().unwrap();
    let second: DateTime<Utc> = usuarios[1]["fechaCreacion"].as_str().unwrap().parse().unwrap();
    assert!(first >= second);
}

#[tokio::test]
async fn list_falls_back_to_default_paging() {
    let (app, _store) = connected_app("development");

    let (status, body) = send(&app, "GET", "/api/usuarios?limit=abc&skip=-4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["limit"], 50);
    assert_eq!(body["pagination"]["skip"], 0);
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn list_keeps_the_first_of_repeated_keys() {
    let (app, _store) = connected_app("development");

    let (status, body) = send(&app, "GET", "/api/usuarios?skip=1&skip=2&limit=3&limit=x", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["pagination"]["skip"], 1);
    assert_eq!(body["pagination"]["limit"], 3);
}

#[tokio::test]
async fn list_reads_leading_digits_of_paging_values() {
    let (app, _store) = connected_app("development");

    let (status, body) = send(&app, "GET", "/api/usuarios?limit=10abc&skip=2.9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["skip"], 2);
}

#[tokio::test]
async fn create_rejects_oversized_body_with_413() {
    let (app, store) = connected_app("development");
    let payload = json!({
        "nombre": "A".repeat(200 * 1024),
        "email": "ana@example.com",
    });

    let (status, body) = send(&app, "POST", "/api/usuarios", Some(payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "Cuerpo de la solicitud demasiado grande");
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn store_panic_becomes_generic_500() {
    let store = Arc::new(InMemoryUserStore::panicking_on_list());
    let app = app_with_store(config("development"), store.clone());

    let (status, body) = send(&app, "GET", "/api/usuarios", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error interno del servidor");
    assert_eq!(body["message"], "cursor state corrupted");

    // The server keeps answering after the panic.
    let (status, _) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn clear_is_forbidden_in_production() {
    let store = Arc::new(InMemoryUserStore::default());
    let app = app_with_store(config("production"), store.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/api/usuarios",
        Some(json!({ "nombre": "Ana", "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "DELETE", "/api/usuarios/limpiar", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Operación no permitida en producción");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn clear_empties_collection_and_is_idempotent() {
    let (app, store) = connected_app("staging");
    for i in 0..3 {
        send(
            &app,
            "POST",
            "/api/usuarios",
            Some(json!({ "nombre": format!("U{}", i), "email": "u@example.com" })),
        )
        .await;
    }

    let (status, body) = send(&app, "DELETE", "/api/usuarios/limpiar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["documentosEliminados"], 3);
    assert_eq!(store.len(), 0);

    let (status, body) = send(&app, "DELETE", "/api/usuarios/limpiar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documentosEliminados"], 0);
}

#[tokio::test]
async fn diagnostic_writes_then_reports_recent_records() {
    let (app, store) = connected_app("development");
    for _ in 0..6 {
        let (status, _) = send(&app, "GET", "/api/test", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/api/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["estadisticas"]["totalDocumentos"], 7);
    assert_eq!(
        body["estadisticas"]["ultimosDocumentos"].as_array().unwrap().len(),
        5
    );
    assert!(body["documentoInsertado"]["id"].is_string());
    assert_eq!(body["documentoInsertado"]["ip"], "unknown");
    assert!(body["documentoInsertado"]["mensaje"].is_string());
    assert_eq!(store.len(), 7);
}

#[tokio::test]
async fn diagnostic_route_can_be_disabled() {
    let mut cfg = config("development");
    cfg.diagnostics_enabled = false;
    let store = Arc::new(InMemoryUserStore::default());
    let app = app_with_store(cfg, store.clone());

    let (status, body) = send(&app, "GET", "/api/test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/test");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn database_failures_surface_as_500_with_details() {
    let store = Arc::new(InMemoryUserStore::failing("server selection timeout"));
    let app = app_with_store(config("development"), store);

    let (status, body) = send(&app, "GET", "/api/usuarios", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error al obtener usuarios");
    assert_eq!(body["details"], "server selection timeout");

    let (status, body) = send(
        &app,
        "POST",
        "/api/usuarios",
        Some(json!({ "nombre": "Ana", "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error al crear usuario");

    let (status, body) = send(&app, "DELETE", "/api/usuarios/limpiar", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error al limpiar colección");

    let (status, body) = send(&app, "GET", "/api/test", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error en la operación de MongoDB");
}
