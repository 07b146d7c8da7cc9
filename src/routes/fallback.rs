use axum::http::{Method, Uri};

use crate::error::Error;

/// Answers every path or method no route claims.
pub async fn not_found(method: Method, uri: Uri) -> Error {
    Error::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
