use std::sync::Arc;

use tracing::info;

use crate::database::store::UserStore;
use crate::error::Result;
use crate::models::user::{UserRecord, DEFAULT_CARRERA};
use crate::utils::time;

pub const RECENT_LIMIT: i64 = 5;

const DIAGNOSTIC_NOMBRE: &str = "Usuario de prueba";
const DIAGNOSTIC_EMAIL: &str = "prueba@ejemplo.com";
const DIAGNOSTIC_CARRERA: &str = "Ingeniería en Sistemas";
const DIAGNOSTIC_MENSAJE: &str = "Prueba desde Docker + MongoDB";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombre: String,
    pub email: String,
    pub carrera: Option<String>,
    pub ip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: i64,
}

pub struct UserPage {
    pub items: Vec<UserRecord>,
    pub total: u64,
    pub skip: u64,
    pub limit: i64,
}

pub struct DiagnosticReport {
    pub inserted: UserRecord,
    pub total: u64,
    pub recent: Vec<UserRecord>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let carrera = new_user
            .carrera
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CARRERA.to_string());

        let record = UserRecord {
            id: None,
            nombre: new_user.nombre,
            email: new_user.email,
            carrera,
            fecha_creacion: time::now_bson(),
            mensaje: None,
            ip: new_user.ip,
        };

        let id = self.store.insert(record.clone()).await?;
        info!(user_id = %id, "User created");
        Ok(record.with_id(id))
    }

    /// Fetches the page before the count, matching the order a caller would
    /// observe on the wire.
    pub async fn list(&self, page: PageRequest) -> Result<UserPage> {
        let items = self.store.list_recent(page.skip, page.limit).await?;
        let total = self.store.count().await?;
        Ok(UserPage {
            items,
            total,
            skip: page.skip,
            limit: page.limit,
        })
    }

    /// Writes one diagnostic record, then reads back the total and the most
    /// recent records. Each step awaits the previous one.
    pub async fn run_diagnostic(&self, ip: String) -> Result<DiagnosticReport> {
        let record = UserRecord {
            id: None,
            nombre: DIAGNOSTIC_NOMBRE.to_string(),
            email: DIAGNOSTIC_EMAIL.to_string(),
            carrera: DIAGNOSTIC_CARRERA.to_string(),
            fecha_creacion: time::now_bson(),
            mensaje: Some(DIAGNOSTIC_MENSAJE.to_string()),
            ip,
        };

        let id = self.store.insert(record.clone()).await?;
        let total = self.store.count().await?;
        let recent = self.store.list_recent(0, RECENT_LIMIT).await?;

        Ok(DiagnosticReport {
            inserted: record.with_id(id),
            total,
            recent,
        })
    }

    pub async fn clear(&self) -> Result<u64> {
        let deleted = self.store.delete_all().await?;
        info!(deleted, "Collection cleared");
        Ok(deleted)
    }
}
