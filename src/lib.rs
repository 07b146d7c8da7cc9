pub mod config;
pub mod database;
pub mod doc;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::database::connection::ConnectionManager;
use crate::error::Result;
use crate::services::user_service::UserService;

/// Everything a handler can see. The connection manager is the only shared
/// piece that changes, and only once.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connection: ConnectionManager,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, connection: ConnectionManager) -> Self {
        Self {
            config: Arc::new(config),
            connection,
            started_at: Instant::now(),
        }
    }

    /// Service over the live store, or `ServiceUnavailable` before any
    /// database call when the connection is not ready.
    pub fn user_service(&self) -> Result<UserService> {
        Ok(UserService::new(self.connection.store()?))
    }
}
