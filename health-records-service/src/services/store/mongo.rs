use super::{EntityStore, Filter};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde_json::Value;
use service_core::error::AppError;

/// MongoDB-backed entity store. Records keep their own string `id`; the
/// driver's `_id` is never exposed.
#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Unique `id` and `profile_id` lookup indexes on each collection.
    pub async fn initialize_indexes(&self, collections: &[&str]) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for health-records-service");

        for name in collections {
            let collection = self.collection(name);

            let id_index = IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("id_lookup".to_string())
                        .unique(true)
                        .build(),
                )
                .build();
            collection.create_index(id_index, None).await.map_err(|e| {
                tracing::error!("Failed to create id index on {}: {}", name, e);
                AppError::from(e)
            })?;

            let profile_index = IndexModel::builder()
                .keys(doc! { "profile_id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("profile_lookup".to_string())
                        .build(),
                )
                .build();
            collection
                .create_index(profile_index, None)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create profile_id index on {}: {}", name, e);
                    AppError::from(e)
                })?;

            tracing::info!(collection = %name, "Created indexes on (id), (profile_id)");
        }

        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

fn to_document(value: Value) -> Result<Document, AppError> {
    bson::to_document(&value).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to encode record as BSON: {}", e))
    })
}

fn filter_document(filter: &Filter) -> Result<Document, AppError> {
    let mut document = Document::new();
    for (field, value) in filter.conditions() {
        let encoded = bson::to_bson(value).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to encode filter value: {}", e))
        })?;
        document.insert(field.clone(), encoded);
    }
    Ok(document)
}

#[async_trait]
impl EntityStore for MongoStore {
    async fn filter(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, AppError> {
        let mut cursor = self
            .collection(collection)
            .find(filter_document(filter)?, None)
            .await
            .map_err(AppError::from)?;

        let mut rows = Vec::new();
        while let Some(mut document) = cursor.try_next().await.map_err(AppError::from)? {
            document.remove("_id");
            let row: Value = bson::from_document(document).map_err(|e| {
                AppError::InternalError(anyhow::anyhow!(
                    "Failed to decode {} record: {}",
                    collection,
                    e
                ))
            })?;
            rows.push(row);
        }

        Ok(rows)
    }

    async fn create(&self, collection: &str, record: Value) -> Result<(), AppError> {
        self.collection(collection)
            .insert_one(to_document(record)?, None)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, changes: Value) -> Result<bool, AppError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "id": id }, doc! { "$set": to_document(changes)? }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.matched_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
