// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory [`DocumentStore`] for tests and offline sessions.
//!
//! Every call is recorded so tests can assert which backend operations a
//! screen performed.

use crate::db::{BatchOp, CollectionPath, Document, DocumentStore, Filter};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::Mutex;

/// Oldest entries are dropped past this many recorded calls.
pub const MAX_LOGGED_OPS: usize = 1024;

/// A recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Create(String),
    Set(String, String),
    Get(String, String),
    Read(String),
    Update(String, String),
    Delete(String, String),
    Batch(usize),
}

#[derive(Default)]
struct Inner {
    collections: BTreeMap<String, BTreeMap<String, Value>>,
    log: VecDeque<StoreOp>,
    offline: bool,
    next_id: u64,
}

impl Inner {
    fn record(&mut self, op: StoreOp) {
        if self.log.len() == MAX_LOGGED_OPS {
            self.log.pop_front();
        }
        self.log.push_back(op);
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline {
            return Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(&mut self, path: &CollectionPath, id: &str, data: Value, merge: bool) {
        let docs = self.collections.entry(path.to_string()).or_default();
        if merge {
            if let (Some(Value::Object(existing)), Value::Object(fields)) = (docs.get_mut(id), &data)
            {
                existing.extend(fields.clone());
                return;
            }
        }
        docs.insert(id.to_string(), data);
    }
}

/// Single-lock in-memory document store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, as an unreachable backend would.
    pub async fn set_offline(&self, offline: bool) {
        self.inner.lock().await.offline = offline;
    }

    /// The most recent calls, oldest first.
    pub async fn ops(&self) -> Vec<StoreOp> {
        self.inner.lock().await.log.iter().cloned().collect()
    }

    pub async fn clear_ops(&self) {
        self.inner.lock().await.log.clear();
    }

    /// Number of documents currently stored in a collection.
    pub async fn len(&self, path: &CollectionPath) -> usize {
        self.inner
            .lock()
            .await
            .collections
            .get(&path.to_string())
            .map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, path: &CollectionPath) -> bool {
        self.len(path).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_record(&self, path: &CollectionPath, data: Value) -> Result<String, AppError> {
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Create(path.to_string()));
        inner.check_online()?;

        inner.next_id += 1;
        let id = format!("doc-{:06}", inner.next_id);
        inner.apply(path, &id, data, false);
        Ok(id)
    }

    async fn set_record(
        &self,
        path: &CollectionPath,
        id: &str,
        data: Value,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Set(path.to_string(), id.to_string()));
        inner.check_online()?;

        inner.apply(path, id, data, false);
        Ok(())
    }

    async fn get_record(
        &self,
        path: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, AppError> {
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Get(path.to_string(), id.to_string()));
        inner.check_online()?;

        Ok(inner
            .collections
            .get(&path.to_string())
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn read_records(
        &self,
        path: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>, AppError> {
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Read(path.to_string()));
        inner.check_online()?;

        let Some(docs) = inner.collections.get(&path.to_string()) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, data)| filter.map_or(true, |f| f.matches(data)))
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect())
    }

    async fn update_record(
        &self,
        path: &CollectionPath,
        id: &str,
        partial: Value,
        merge: bool,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Update(path.to_string(), id.to_string()));
        inner.check_online()?;

        inner.apply(path, id, partial, merge);
        Ok(())
    }

    async fn delete_record(&self, path: &CollectionPath, id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Delete(path.to_string(), id.to_string()));
        inner.check_online()?;

        if let Some(docs) = inner.collections.get_mut(&path.to_string()) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn batch_write(&self, ops: Vec<BatchOp>) -> Result<(), AppError> {
        // The lock is held across every write, so readers never see a partial batch.
        let mut inner = self.inner.lock().await;
        inner.record(StoreOp::Batch(ops.len()));
        inner.check_online()?;

        for op in ops {
            inner.apply(&op.path, &op.id, op.data, op.merge);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_merge_keeps_other_fields() {
        let store = MemoryStore::new();
        let path = CollectionPath::root("items");

        store
            .set_record(&path, "a", json!({ "name": "x", "count": 1 }))
            .await
            .unwrap();
        store
            .update_record(&path, "a", json!({ "count": 2 }), true)
            .await
            .unwrap();

        let doc = store.get_record(&path, "a").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({ "name": "x", "count": 2 }));
    }

    #[tokio::test]
    async fn test_replace_without_merge() {
        let store = MemoryStore::new();
        let path = CollectionPath::root("items");

        store
            .set_record(&path, "a", json!({ "name": "x", "count": 1 }))
            .await
            .unwrap();
        store
            .update_record(&path, "a", json!({ "count": 2 }), false)
            .await
            .unwrap();

        let doc = store.get_record(&path, "a").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({ "count": 2 }));
    }

    #[tokio::test]
    async fn test_read_filters_and_logs() {
        let store = MemoryStore::new();
        let path = CollectionPath::root("items");

        store
            .create_record(&path, json!({ "userId": "u1" }))
            .await
            .unwrap();
        store
            .create_record(&path, json!({ "userId": "u2" }))
            .await
            .unwrap();

        let docs = store
            .read_records(&path, Some(&Filter::eq("userId", "u1")))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(
            store.ops().await,
            vec![
                StoreOp::Create("items".to_string()),
                StoreOp::Create("items".to_string()),
                StoreOp::Read("items".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_op_log_keeps_only_recent_calls() {
        let store = MemoryStore::new();
        let path = CollectionPath::root("items");

        for _ in 0..MAX_LOGGED_OPS {
            store.get_record(&path, "old").await.unwrap();
        }
        store.get_record(&path, "new").await.unwrap();

        let ops = store.ops().await;
        assert_eq!(ops.len(), MAX_LOGGED_OPS);
        assert_eq!(
            ops.last(),
            Some(&StoreOp::Get("items".to_string(), "new".to_string()))
        );
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true).await;

        let err = store
            .read_records(&CollectionPath::root("items"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
