#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use users_backend::{
    config::{Config, DatabaseConfig},
    database::{connection::ConnectionManager, store::UserStore},
    error::{Error, Result},
    models::user::UserRecord,
    routes, AppState,
};

/// Keeps records in memory and counts every call made through the port.
#[derive(Default)]
pub struct InMemoryUserStore {
    records: Mutex<Vec<UserRecord>>,
    calls: AtomicUsize,
    failure: Option<String>,
    panic_on_list: bool,
}

impl InMemoryUserStore {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Panics inside `list_recent`, as a driver bug would.
    pub fn panicking_on_list() -> Self {
        Self {
            panic_on_list: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(Error::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, record: UserRecord) -> Result<ObjectId> {
        self.enter()?;
        let id = ObjectId::new();
        self.records.lock().unwrap().push(record.with_id(id));
        Ok(id)
    }

    async fn count(&self) -> Result<u64> {
        self.enter()?;
        Ok(self.records.lock().unwrap().len() as u64)
    }

    async fn list_recent(&self, skip: u64, limit: i64) -> Result<Vec<UserRecord>> {
        self.enter()?;
        if self.panic_on_list {
            panic!("cursor state corrupted");
        }
        // Later inserts win ties on the millisecond timestamp.
        let mut records: Vec<UserRecord> = self.records.lock().unwrap().iter().rev().cloned().collect();
        records.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion));
        Ok(records
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete_all(&self) -> Result<u64> {
        self.enter()?;
        let mut records = self.records.lock().unwrap();
        let deleted = records.len() as u64;
        records.clear();
        Ok(deleted)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

pub fn config(environment: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: environment.to_string(),
        database: DatabaseConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database_name: "testdb".to_string(),
            connect_timeout: None,
        },
        diagnostics_enabled: true,
        trust_proxy: false,
    }
}

pub fn connected_app(environment: &str) -> (Router, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::default());
    let app = app_with_store(config(environment), store.clone());
    (app, store)
}

pub fn app_with_store(config: Config, store: Arc<InMemoryUserStore>) -> Router {
    let connection = ConnectionManager::new();
    connection.mark_connected(store);
    routes::router(AppState::new(config, connection))
}

pub fn disconnected_app(config: Config) -> (Router, ConnectionManager) {
    let connection = ConnectionManager::new();
    let app = routes::router(AppState::new(config, connection.clone()));
    (app, connection)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
