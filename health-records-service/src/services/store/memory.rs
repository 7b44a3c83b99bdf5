use super::{EntityStore, Filter};
use crate::models::Entity;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::Value;
use service_core::error::AppError;

/// Process-local entity store for development and tests.
///
/// Counts queries per collection and can be told to fail a collection, which
/// lets tests observe fan-out and failure propagation.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Value>>,
    query_counts: DashMap<String, usize>,
    failing: DashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert typed records directly, bypassing query accounting.
    pub fn seed<T: Entity>(&self, records: &[T]) {
        let mut rows = self
            .collections
            .entry(T::COLLECTION.to_string())
            .or_default();
        for record in records {
            if let Ok(value) = serde_json::to_value(record) {
                rows.push(value);
            }
        }
    }

    /// Make every subsequent operation on `collection` return an error.
    pub fn fail_collection(&self, collection: &str) {
        self.failing.insert(collection.to_string());
    }

    pub fn query_count(&self, collection: &str) -> usize {
        self.query_counts
            .get(collection)
            .map(|count| *count)
            .unwrap_or(0)
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    fn check_available(&self, collection: &str) -> Result<(), AppError> {
        if self.failing.contains(collection) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "collection {} is unavailable",
                collection
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn filter(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, AppError> {
        *self.query_counts.entry(collection.to_string()).or_insert(0) += 1;
        self.check_available(collection)?;

        Ok(self
            .collections
            .get(collection)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, record: Value) -> Result<(), AppError> {
        self.check_available(collection)?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, changes: Value) -> Result<bool, AppError> {
        self.check_available(collection)?;

        let Some(mut rows) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
        else {
            return Ok(false);
        };

        if let (Some(target), Value::Object(changes)) = (row.as_object_mut(), changes) {
            for (field, value) in changes {
                target.insert(field, value);
            }
        }
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
