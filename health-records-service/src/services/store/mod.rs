//! Entity store seam.
//!
//! The store itself only knows named collections of JSON-shaped records with
//! field-equality filters, matching the hosted data API the handlers were
//! written against. [`Repository`] layers the typed [`Entity`] records on top.

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::models::Entity;
use async_trait::async_trait;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

/// Conjunction of `field == value` conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn filter(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, AppError>;

    async fn create(&self, collection: &str, record: Value) -> Result<(), AppError>;

    /// Apply `changes` to the record with `id`. Returns false when nothing matched.
    async fn update(&self, collection: &str, id: &str, changes: Value) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Typed access to the entity store.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn EntityStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list<T: Entity>(&self, filter: Filter) -> Result<Vec<T>, AppError> {
        let rows = self.store.filter(T::COLLECTION, &filter).await.map_err(|e| {
            tracing::error!(collection = T::COLLECTION, error = %e, "Entity query failed");
            e
        })?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    AppError::InternalError(anyhow::anyhow!(
                        "Malformed {} record: {}",
                        T::COLLECTION,
                        e
                    ))
                })
            })
            .collect()
    }

    pub async fn list_for_profile<T: Entity>(&self, profile_id: &str) -> Result<Vec<T>, AppError> {
        self.list(Filter::new().eq("profile_id", profile_id)).await
    }

    pub async fn find_by_id<T: Entity>(&self, id: &str) -> Result<Option<T>, AppError> {
        let mut found = self.list::<T>(Filter::new().eq("id", id)).await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    pub async fn create<T: Entity>(&self, record: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(record).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to serialize {} record: {}",
                T::COLLECTION,
                e
            ))
        })?;

        self.store.create(T::COLLECTION, value).await.map_err(|e| {
            tracing::error!(
                collection = T::COLLECTION,
                id = %record.id(),
                error = %e,
                "Entity create failed"
            );
            e
        })
    }

    pub async fn update<T: Entity>(&self, id: &str, changes: Value) -> Result<bool, AppError> {
        self.store.update(T::COLLECTION, id, changes).await
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_requires_every_condition() {
        let record = json!({ "id": "d1", "profile_id": "p1", "document_type": "lab" });

        assert!(Filter::new().eq("profile_id", "p1").matches(&record));
        assert!(Filter::new()
            .eq("profile_id", "p1")
            .eq("document_type", "lab")
            .matches(&record));
        assert!(!Filter::new()
            .eq("profile_id", "p1")
            .eq("document_type", "imaging")
            .matches(&record));
        assert!(!Filter::new().eq("missing", "x").matches(&record));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&json!({ "id": "anything" })));
    }
}
