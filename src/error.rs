use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, Error>;

pub const UNAVAILABLE_MESSAGE: &str = "No hay conexión con MongoDB. Verifica tu configuración.";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database connection is not available")]
    ServiceUnavailable,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {method} {path}")]
    NotFound { method: String, path: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{context}: {source}")]
    Operation {
        context: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Attaches the route-level message to server-side failures; client
    /// errors pass through untouched.
    pub fn during(self, context: &'static str) -> Self {
        match self {
            Error::Database(_) | Error::Internal(_) => Error::Operation {
                context,
                source: Box::new(self),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Error::BadRequest(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Error::Database(err) => err.to_string(),
            Error::Internal(msg) => msg.clone(),
            Error::Operation { source, .. } => source.detail(),
            other => other.to_string(),
        }
    }
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for field_errors in errors.field_errors().values() {
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
    }
    messages.sort();
    messages.join("; ")
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() && !matches!(self, Error::ServiceUnavailable) {
            tracing::error!(error = %self, "request failed");
        }

        let body = match &self {
            Error::ServiceUnavailable => json!({
                "error": "Servicio no disponible",
                "message": UNAVAILABLE_MESSAGE,
            }),
            Error::BadRequest(msg) => json!({
                "error": "Datos incompletos",
                "message": msg,
            }),
            Error::Validation(errors) => json!({
                "error": "Datos incompletos",
                "message": validation_message(errors),
            }),
            Error::PayloadTooLarge(msg) => json!({
                "error": "Cuerpo de la solicitud demasiado grande",
                "message": msg,
            }),
            Error::Forbidden(msg) => json!({ "error": msg }),
            Error::NotFound { method, path } => json!({
                "error": "Ruta no encontrada",
                "path": path,
                "method": method,
            }),
            Error::Database(_) => json!({
                "error": "Error en la operación de MongoDB",
                "details": self.detail(),
            }),
            Error::Operation { context, .. } => json!({
                "error": context,
                "details": self.detail(),
            }),
            Error::Config(_) | Error::Internal(_) => json!({
                "error": "Error interno del servidor",
                "message": self.detail(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
