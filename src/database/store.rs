//! The port every data route goes through.
//!
//! Handlers never talk to the driver directly; they reach the database via a
//! [`UserStore`] handed out by the connection manager, which keeps the
//! readiness check and the database calls in one place and lets tests swap
//! the backend.

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::error::Result;
use crate::models::user::UserRecord;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a record and return the identifier the database assigned.
    async fn insert(&self, record: UserRecord) -> Result<ObjectId>;

    async fn count(&self) -> Result<u64>;

    /// Records sorted by creation time, newest first.
    async fn list_recent(&self, skip: u64, limit: i64) -> Result<Vec<UserRecord>>;

    /// Delete every record; returns how many were removed.
    async fn delete_all(&self) -> Result<u64>;

    async fn close(&self) -> Result<()>;
}
