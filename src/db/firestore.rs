// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`DocumentStore`].
//!
//! Documents are handled as JSON values; the typed models live in
//! `crate::models` and are converted at the service layer.

use crate::db::{BatchOp, CollectionPath, Document, DocumentStore, Filter};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Field injected by the firestore crate when deserializing a document.
const FIRESTORE_ID_FIELD: &str = "_firestore_id";

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Resolve the parent document path of a collection.
    fn parent_path(&self, path: &CollectionPath) -> Result<String, AppError> {
        let client = self.get_client()?;
        match path.parent() {
            Some((collection, id)) => client
                .parent_path(collection, id)
                .map(Into::into)
                .map_err(|e| AppError::Database(e.to_string())),
            None => Ok(client.get_documents_path().clone()),
        }
    }

    /// Split the crate-injected id out of a deserialized document.
    fn into_document(mut data: Value) -> Result<Document, AppError> {
        let id = data
            .as_object_mut()
            .and_then(|map| map.remove(FIRESTORE_ID_FIELD))
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| AppError::Database("Document without id".to_string()))?;
        Ok(Document { id, data })
    }

    async fn write(
        &self,
        path: &CollectionPath,
        id: &str,
        data: &Value,
        merge: bool,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;
        let parent = self.parent_path(path)?;

        if merge {
            let _: () = client
                .fluent()
                .update()
                .fields(field_names(data))
                .in_col(path.name())
                .document_id(id)
                .parent(&parent)
                .object(data)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        } else {
            let _: () = client
                .fluent()
                .update()
                .in_col(path.name())
                .document_id(id)
                .parent(&parent)
                .object(data)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

/// Top-level field names of a document body (the merge mask).
fn field_names(data: &Value) -> Vec<String> {
    data.as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for FirestoreDb {
    async fn create_record(&self, path: &CollectionPath, data: Value) -> Result<String, AppError> {
        let client = self.get_client()?;
        let parent = self.parent_path(path)?;
        let id = uuid::Uuid::new_v4().simple().to_string();

        let _: () = client
            .fluent()
            .insert()
            .into(path.name())
            .document_id(&id)
            .parent(&parent)
            .object(&data)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(collection = %path, id = %id, "Created document");
        Ok(id)
    }

    async fn set_record(
        &self,
        path: &CollectionPath,
        id: &str,
        data: Value,
    ) -> Result<(), AppError> {
        self.write(path, id, &data, false).await
    }

    async fn get_record(
        &self,
        path: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, AppError> {
        let parent = self.parent_path(path)?;
        let data: Option<Value> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(path.name())
            .parent(&parent)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        data.map(Self::into_document).transpose()
    }

    async fn read_records(
        &self,
        path: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>, AppError> {
        let parent = self.parent_path(path)?;
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(path.name())
            .parent(&parent);

        let result = if let Some(filter) = filter {
            let field = filter.field.clone();
            let value = filter.value.clone();
            query
                .filter(move |q| q.for_all([q.field(field.as_str()).eq(value.clone())]))
                .obj()
                .query()
                .await
        } else {
            query.obj().query().await
        };
        let rows: Vec<Value> = result.map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(collection = %path, count = rows.len(), "Read documents");
        rows.into_iter().map(Self::into_document).collect()
    }

    async fn update_record(
        &self,
        path: &CollectionPath,
        id: &str,
        partial: Value,
        merge: bool,
    ) -> Result<(), AppError> {
        self.write(path, id, &partial, merge).await
    }

    async fn delete_record(&self, path: &CollectionPath, id: &str) -> Result<(), AppError> {
        let parent = self.parent_path(path)?;
        self.get_client()?
            .fluent()
            .delete()
            .from(path.name())
            .document_id(id)
            .parent(&parent)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Commit all writes in one transaction.
    ///
    /// Batches larger than a single transaction can hold are rejected rather
    /// than split, since splitting would break atomicity.
    async fn batch_write(&self, ops: Vec<BatchOp>) -> Result<(), AppError> {
        if ops.len() > BATCH_SIZE {
            return Err(AppError::Database(format!(
                "Batch of {} writes exceeds limit of {}",
                ops.len(),
                BATCH_SIZE
            )));
        }

        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for op in &ops {
            let parent = self.parent_path(&op.path)?;
            let added = if op.merge {
                client
                    .fluent()
                    .update()
                    .fields(field_names(&op.data))
                    .in_col(op.path.name())
                    .document_id(&op.id)
                    .parent(&parent)
                    .object(&op.data)
                    .add_to_transaction(&mut transaction)
            } else {
                client
                    .fluent()
                    .update()
                    .in_col(op.path.name())
                    .document_id(&op.id)
                    .parent(&parent)
                    .object(&op.data)
                    .add_to_transaction(&mut transaction)
            };
            added.map_err(|e| AppError::Database(format!("Failed to add write to batch: {}", e)))?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Batch commit failed: {}", e)))?;

        tracing::debug!(writes = ops.len(), "Batch committed");
        Ok(())
    }
}
