// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (`users/{uid}`)
//! - Progress (`users/{uid}/progress/{topic}`)
//!
//! All writes are masked merges: only the listed field paths change.

use crate::config::Config;
use crate::db::MemoryStore;
use crate::error::AppError;
use firestore::FirestoreTransformServerValue;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::OnceCell;

/// Process-wide handle, connected on first use.
static SHARED: OnceCell<FirestoreDb> = OnceCell::const_new();

/// Location of a single document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocPath {
    parent: Option<(&'static str, String)>,
    collection: &'static str,
    id: String,
}

impl DocPath {
    pub(crate) fn new(collection: &'static str, id: impl Into<String>) -> Self {
        Self {
            parent: None,
            collection,
            id: id.into(),
        }
    }

    /// A document in a sub-collection of `parent_collection/parent_id`.
    pub(crate) fn nested(
        parent_collection: &'static str,
        parent_id: impl Into<String>,
        collection: &'static str,
        id: impl Into<String>,
    ) -> Self {
        Self {
            parent: Some((parent_collection, parent_id.into())),
            collection,
            id: id.into(),
        }
    }

    /// Full slash-separated path, used as the in-memory key.
    pub(crate) fn key(&self) -> String {
        match &self.parent {
            Some((col, id)) => format!("{}/{}/{}/{}", col, id, self.collection, self.id),
            None => format!("{}/{}", self.collection, self.id),
        }
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(MemoryStore),
    Offline,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

impl FirestoreDb {
    /// Get the process-wide handle, connecting on the first call.
    ///
    /// Concurrent first calls share one connection attempt. A failed attempt
    /// leaves the cell empty so the next call retries.
    pub async fn shared(config: &Config) -> Result<&'static FirestoreDb, AppError> {
        SHARED
            .get_or_try_init(|| async {
                if config.offline {
                    tracing::info!("Using in-memory document store (offline mode)");
                    Ok(Self::new_in_memory())
                } else {
                    Self::new(&config.gcp_project_id).await
                }
            })
            .await
    }

    /// Create a new Firestore client.
    ///
    /// Credentials come from the environment (`GOOGLE_APPLICATION_CREDENTIALS`
    /// or the metadata server). For local development with the emulator, set
    /// FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
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
            backend: Backend::Firestore(client),
        })
    }

    /// Create a handle backed by an in-process document map.
    pub fn new_in_memory() -> Self {
        Self::with_memory_store(MemoryStore::new())
    }

    /// Create a handle over an existing in-memory store (shared with its clones).
    pub fn with_memory_store(store: MemoryStore) -> Self {
        Self {
            backend: Backend::Memory(store),
        }
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    // ─── Document Primitives ─────────────────────────────────────

    /// Read one document, `None` if it does not exist.
    pub(crate) async fn read_doc<T>(&self, doc: &DocPath) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let select = client.fluent().select().by_id_in(doc.collection);
                let select = match &doc.parent {
                    Some((col, id)) => select.parent(
                        client
                            .parent_path(col, id)
                            .map_err(|e| AppError::Database(e.to_string()))?,
                    ),
                    None => select,
                };

                select
                    .obj()
                    .one(&doc.id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => store
                .get(&doc.key())
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| AppError::Database(format!("Corrupt document {}: {}", doc.key(), e))),
            Backend::Offline => Err(offline()),
        }
    }

    /// Write the listed field paths of `object` into a document, creating
    /// it if needed. Fields not listed keep their stored values.
    ///
    /// Each path in `server_times` is set to the store's own clock at
    /// commit time. These paths must not also appear in `fields`.
    pub(crate) async fn merge_doc<T>(
        &self,
        doc: &DocPath,
        object: &T,
        fields: Vec<String>,
        server_times: &[&str],
    ) -> Result<(), AppError>
    where
        T: Serialize + Sync + Send,
        for<'de> T: Deserialize<'de>,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                // Field transforms are only sent with transactional or batched
                // writes, so even a single-document write goes through one.
                let mut transaction = client.begin_transaction().await.map_err(|e| {
                    AppError::Database(format!("Failed to begin transaction: {}", e))
                })?;

                let update = client
                    .fluent()
                    .update()
                    .fields(fields)
                    .in_col(doc.collection)
                    .document_id(&doc.id);
                let update = match &doc.parent {
                    Some((col, id)) => update.parent(
                        client
                            .parent_path(col, id)
                            .map_err(|e| AppError::Database(e.to_string()))?,
                    ),
                    None => update,
                };

                update
                    .object(object)
                    .transforms(|t| {
                        t.fields(server_times.iter().map(|field| {
                            t.field(*field)
                                .server_value(FirestoreTransformServerValue::RequestTime)
                        }))
                    })
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add write to transaction: {}", e))
                    })?;

                transaction.commit().await.map_err(|e| {
                    AppError::Database(format!("Failed to commit {}: {}", doc.key(), e))
                })?;
                Ok(())
            }
            Backend::Memory(store) => {
                let source = serde_json::to_value(object)
                    .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))?;
                store.merge(&doc.key(), &source, &fields, server_times);
                Ok(())
            }
            Backend::Offline => Err(offline()),
        }
    }
}

fn offline() -> AppError {
    AppError::Database("Database not connected (offline mode)".to_string())
}

/// Fields the `firestore` deserializer adds to every document it reads.
pub(crate) fn is_metadata_field(name: &str) -> bool {
    name.starts_with("_firestore_")
}

/// Reject empty document IDs before they reach the store.
pub(crate) fn require_id(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", name)));
    }
    Ok(())
}
