//! Connection lifecycle for the single database handle.
//!
//! The outcome of the startup connection attempt is written exactly once.
//! Until then, and forever after a failure, the manager reports not ready
//! and data routes answer 503. There is no reconnect: a failed process stays
//! degraded until it is restarted.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::database::mongo::MongoUserStore;
use crate::database::store::UserStore;
use crate::error::{Error, Result};

enum ConnectionState {
    Connected(Arc<dyn UserStore>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
    Failed,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected | ConnectionStatus::Failed => "disconnected",
        }
    }
}

/// Shared, cloneable view of the database connection.
#[derive(Clone, Default)]
pub struct ConnectionManager {
    state: Arc<OnceLock<ConnectionState>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts the one and only connection to MongoDB. Failures are logged
    /// and recorded, never returned: the process keeps serving the routes
    /// that do not need the database.
    pub async fn connect(&self, config: &DatabaseConfig) -> bool {
        info!(database = %config.database_name, "Connecting to MongoDB");
        match MongoUserStore::connect(config).await {
            Ok(store) => {
                let connected = self.mark_connected(Arc::new(store));
                if connected {
                    info!(database = %config.database_name, "Connected to MongoDB");
                }
                connected
            }
            Err(err) => {
                error!(error = %err, "Failed to connect to MongoDB; data routes will report unavailable");
                self.mark_failed(err.to_string());
                false
            }
        }
    }

    /// Records a successful connection. Returns `false` if the outcome was
    /// already decided.
    pub fn mark_connected(&self, store: Arc<dyn UserStore>) -> bool {
        let accepted = self.state.set(ConnectionState::Connected(store)).is_ok();
        if !accepted {
            warn!("Connection state already resolved; ignoring new store");
        }
        accepted
    }

    pub fn mark_failed(&self, reason: impl Into<String>) -> bool {
        self.state.set(ConnectionState::Failed(reason.into())).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state.get(), Some(ConnectionState::Connected(_)))
    }

    pub fn status(&self) -> ConnectionStatus {
        match self.state.get() {
            None => ConnectionStatus::Disconnected,
            Some(ConnectionState::Connected(_)) => ConnectionStatus::Connected,
            Some(ConnectionState::Failed(_)) => ConnectionStatus::Failed,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self.state.get() {
            Some(ConnectionState::Failed(reason)) => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn store(&self) -> Result<Arc<dyn UserStore>> {
        match self.state.get() {
            Some(ConnectionState::Connected(store)) => Ok(Arc::clone(store)),
            _ => Err(Error::ServiceUnavailable),
        }
    }

    /// Closes the handle if one was opened.
    pub async fn shutdown(&self) -> Result<()> {
        match self.state.get() {
            Some(ConnectionState::Connected(store)) => store.close().await,
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("status", &self.status())
            .finish()
    }
}
