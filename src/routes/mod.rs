pub mod diagnostic;
pub mod fallback;
pub mod health;
pub mod home;
pub mod usuarios;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{doc, middleware::panic::handle_panic, AppState};

/// Matches the default JSON body limit of the service this API replaces.
pub const BODY_LIMIT: usize = 100 * 1024;

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(home::index).fallback(fallback::not_found))
        .route(
            "/api/health",
            get(health::health).fallback(fallback::not_found),
        )
        .route(
            "/api/usuarios",
            get(usuarios::list_users)
                .post(usuarios::create_user)
                .fallback(fallback::not_found),
        )
        .route(
            "/api/usuarios/limpiar",
            delete(usuarios::clear_users).fallback(fallback::not_found),
        )
        .route(
            "/api/openapi.json",
            get(doc::openapi_json).fallback(fallback::not_found),
        );

    if state.config.diagnostics_enabled {
        app = app.route(
            "/api/test",
            get(diagnostic::run_diagnostic).fallback(fallback::not_found),
        );
    }

    app.fallback(fallback::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}
