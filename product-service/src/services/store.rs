//! Document store adapter.
//!
//! Wraps the single MongoDB handle shared by every request and exposes
//! schema-less insert / query / introspection over named collections.

use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    options::{ClientOptions, FindOptions},
    Client as MongoClient, Database,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error("Failed to connect to database: {0}")]
    Connection(#[source] mongodb::error::Error),

    #[error("Failed to persist document: {0}")]
    Persistence(#[source] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encoding(#[from] bson::ser::Error),

    #[error("Failed to query documents: {0}")]
    Query(#[source] mongodb::error::Error),
}

#[derive(Clone)]
struct Handle {
    client: MongoClient,
    db: Database,
}

/// Cheap to clone; clones share the driver's connection pool.
#[derive(Clone, Default)]
pub struct DocumentStore {
    handle: Option<Handle>,
}

impl DocumentStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!("Connecting to MongoDB");
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            StoreError::Connection(e)
        })?;
        options.app_name = Some("product-service".to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            StoreError::Connection(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client initialized");

        Ok(Self {
            handle: Some(Handle { client, db }),
        })
    }

    /// A store with no backing handle. Every operation reports
    /// [`StoreError::Unavailable`].
    pub fn unavailable() -> Self {
        Self { handle: None }
    }

    pub fn is_available(&self) -> bool {
        self.handle.is_some()
    }

    pub fn database_name(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.db.name())
    }

    pub fn database(&self) -> Option<&Database> {
        self.handle.as_ref().map(|h| &h.db)
    }

    fn db(&self) -> Result<&Database, StoreError> {
        self.database().ok_or(StoreError::Unavailable)
    }

    /// Persists `record` into `collection`, stamping `created_at` and
    /// `updated_at`, and returns the generated identifier.
    pub async fn insert<T: Serialize>(
        &self,
        collection: &str,
        record: &T,
    ) -> Result<ObjectId, StoreError> {
        let db = self.db()?;

        let id = ObjectId::new();
        let now = BsonDateTime::now();
        let mut document = bson::to_document(record)?;
        document.insert("_id", id);
        document.insert("created_at", now);
        document.insert("updated_at", now);

        db.collection::<Document>(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "Insert failed: {}", e);
                StoreError::Persistence(e)
            })?;

        tracing::debug!(collection = %collection, id = %id, "Document inserted");
        Ok(id)
    }

    /// Returns up to `limit` documents matching `filter` exactly, in whatever
    /// order the store yields them.
    pub async fn query(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let db = self.db()?;

        if limit <= 0 {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder().limit(limit).build();
        let cursor = db
            .collection::<Document>(collection)
            .find(filter, options)
            .await
            .map_err(StoreError::Query)?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!(collection = %collection, "Query failed: {}", e);
            StoreError::Query(e)
        })
    }

    pub async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        self.db()?
            .list_collection_names(None)
            .await
            .map_err(StoreError::Query)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let handle = self.handle.as_ref().ok_or(StoreError::Unavailable)?;
        handle
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::Query(e)
            })?;
        Ok(())
    }

    /// The driver closes pooled connections on drop.
    pub async fn shutdown(self) {
        if let Some(handle) = self.handle {
            tracing::info!(database = %handle.db.name(), "Releasing MongoDB client");
            drop(handle);
        }
    }
}
