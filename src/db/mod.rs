//! Database layer (document store).
//!
//! Screens talk to the backend through [`DocumentStore`], which is
//! implemented by [`FirestoreDb`] in production and [`MemoryStore`] in tests
//! and offline sessions.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::{MemoryStore, StoreOp};

use crate::error::AppError;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Root collection, filtered by `userId`
    pub const BMI_RECORDS: &str = "bmiRecords";
    /// Nested under `users/{uid}`
    pub const WORKOUTS: &str = "workouts";
    /// Nested under `users/{uid}`
    pub const NUTRITION_GOALS: &str = "nutritionGoals";
}

/// Location of a collection: either at the root or nested under a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    parent: Option<(String, String)>,
    name: String,
}

impl CollectionPath {
    pub fn root(name: &str) -> Self {
        Self {
            parent: None,
            name: name.to_string(),
        }
    }

    pub fn nested(parent_collection: &str, parent_id: &str, name: &str) -> Self {
        Self {
            parent: Some((parent_collection.to_string(), parent_id.to_string())),
            name: name.to_string(),
        }
    }

    /// `users/{uid}/<name>`
    pub fn user_scoped(uid: &str, name: &str) -> Self {
        Self::nested(collections::USERS, uid, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<(&str, &str)> {
        self.parent
            .as_ref()
            .map(|(col, id)| (col.as_str(), id.as_str()))
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some((col, id)) => write!(f, "{}/{}/{}", col, id, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Single-field equality filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Whether a stored document satisfies this filter.
    pub fn matches(&self, data: &Value) -> bool {
        data.get(&self.field).and_then(Value::as_str) == Some(self.value.as_str())
    }
}

/// A stored document and its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Deserialize the document, injecting its id as the `id` field.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let mut data = self.data;
        if let Value::Object(map) = &mut data {
            map.insert("id".to_string(), Value::String(self.id));
        }
        serde_json::from_value(data)
            .map_err(|e| AppError::Database(format!("Malformed document: {}", e)))
    }
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOp {
    pub path: CollectionPath,
    pub id: String,
    pub data: Value,
    pub merge: bool,
}

/// Serialize a model into document data, dropping the `id` field.
///
/// Ids live in the document key, not in its body.
pub fn to_data<T: Serialize>(value: &T) -> Result<Value, AppError> {
    let mut data = serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode document: {}", e)))?;
    if let Value::Object(map) = &mut data {
        map.remove("id");
    }
    Ok(data)
}

/// Request/response document store used by every screen.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned id.
    async fn create_record(&self, path: &CollectionPath, data: Value) -> Result<String, AppError>;

    /// Create or replace a document with a known id.
    async fn set_record(&self, path: &CollectionPath, id: &str, data: Value)
        -> Result<(), AppError>;

    async fn get_record(&self, path: &CollectionPath, id: &str)
        -> Result<Option<Document>, AppError>;

    async fn read_records(
        &self,
        path: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>, AppError>;

    /// Write `partial`. With `merge`, only the given top-level fields change
    /// and a missing document is created.
    async fn update_record(
        &self,
        path: &CollectionPath,
        id: &str,
        partial: Value,
        merge: bool,
    ) -> Result<(), AppError>;

    async fn delete_record(&self, path: &CollectionPath, id: &str) -> Result<(), AppError>;

    /// Apply all writes atomically, or none of them.
    async fn batch_write(&self, ops: Vec<BatchOp>) -> Result<(), AppError>;
}
