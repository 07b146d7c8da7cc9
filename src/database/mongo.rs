use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::config::DatabaseConfig;
use crate::database::store::UserStore;
use crate::error::{Error, Result};
use crate::models::user::UserRecord;

pub const ADMIN_DATABASE: &str = "admin";
pub const USERS_COLLECTION: &str = "usuarios";

/// Newest first; `_id` breaks ties between records stamped in the same
/// millisecond so pages do not overlap.
fn newest_first() -> Document {
    doc! { "fechaCreacion": -1, "_id": -1 }
}

/// [`UserStore`] backed by the `usuarios` collection of a MongoDB deployment.
#[derive(Clone)]
pub struct MongoUserStore {
    client: Client,
    users: Collection<UserRecord>,
}

impl MongoUserStore {
    /// Opens the client and pings the admin database before handing out a
    /// collection handle, so a returned store is known to be reachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        if let Some(timeout) = config.connect_timeout {
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(options)?;
        client
            .database(ADMIN_DATABASE)
            .run_command(doc! { "ping": 1 })
            .await?;

        let users = client
            .database(&config.database_name)
            .collection::<UserRecord>(USERS_COLLECTION);

        Ok(Self { client, users })
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, record: UserRecord) -> Result<ObjectId> {
        let result = self.users.insert_one(&record).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Error::Internal("inserted _id is not an ObjectId".to_string()))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.count_documents(doc! {}).await?)
    }

    async fn list_recent(&self, skip: u64, limit: i64) -> Result<Vec<UserRecord>> {
        let cursor = self
            .users
            .find(doc! {})
            .sort(newest_first())
            .skip(skip)
            .limit(limit)
            .await?;
        let records: Vec<UserRecord> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = self.users.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
