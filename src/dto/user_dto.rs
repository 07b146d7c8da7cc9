use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::user::UserRecord;
use crate::services::user_service::{DiagnosticReport, PageRequest, UserPage};

pub const DEFAULT_SKIP: u64 = 0;
pub const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(
        required(message = "nombre y email son requeridos"),
        length(min = 1, message = "nombre y email son requeridos")
    )]
    pub nombre: Option<String>,
    #[validate(
        required(message = "nombre y email son requeridos"),
        length(min = 1, message = "nombre y email son requeridos")
    )]
    pub email: Option<String>,
    pub carrera: Option<String>,
}

/// Raw `skip`/`limit` query values. Kept as strings so that garbage falls
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Records to skip (default 0)
    pub skip: Option<String>,
    /// Maximum records to return (default 50)
    pub limit: Option<String>,
}

impl ListUsersQuery {
    /// Builds the query from decoded key/value pairs. The first occurrence of
    /// a repeated key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "skip" => &mut query.skip,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    pub fn page(&self) -> PageRequest {
        let parse = |raw: &Option<String>| raw.as_deref().and_then(leading_integer);

        let skip = parse(&self.skip)
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_SKIP);
        let limit = parse(&self.limit)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_LIMIT);

        PageRequest { skip, limit }
    }
}

/// Reads an optional sign and the leading decimal digits, ignoring whatever
/// follows (`"10abc"` is 10, `"2.9"` is 2). `None` when no digit leads.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub carrera: String,
    pub fecha_creacion: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    pub ip: String,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            nombre: record.nombre,
            email: record.email,
            carrera: record.carrera,
            fecha_creacion: record.fecha_creacion.to_chrono(),
            mensaje: record.mensaje,
            ip: record.ip,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub total: u64,
    pub limit: i64,
    pub skip: u64,
    pub returned: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub pagination: Pagination,
    pub usuarios: Vec<UserResponse>,
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        Self {
            success: true,
            pagination: Pagination {
                total: page.total,
                limit: page.limit,
                skip: page.skip,
                returned: page.items.len(),
            },
            usuarios: page.items.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub success: bool,
    pub message: String,
    pub usuario: UserResponse,
}

impl From<UserRecord> for CreateUserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            success: true,
            message: "Usuario creado exitosamente".to_string(),
            usuario: UserResponse::from(record),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticStats {
    pub total_documentos: u64,
    pub ultimos_documentos: Vec<UserResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResponse {
    pub success: bool,
    pub mensaje: String,
    pub documento_insertado: UserResponse,
    pub estadisticas: DiagnosticStats,
}

impl From<DiagnosticReport> for DiagnosticResponse {
    fn from(report: DiagnosticReport) -> Self {
        Self {
            success: true,
            mensaje: "✅ Operación exitosa en MongoDB".to_string(),
            documento_insertado: UserResponse::from(report.inserted),
            estadisticas: DiagnosticStats {
                total_documentos: report.total,
                ultimos_documentos: report.recent.into_iter().map(UserResponse::from).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearUsersResponse {
    pub success: bool,
    pub message: String,
    pub documentos_eliminados: u64,
}

impl ClearUsersResponse {
    pub fn new(deleted: u64) -> Self {
        Self {
            success: true,
            message: "Colección limpiada".to_string(),
            documentos_eliminados: deleted,
        }
    }
}
