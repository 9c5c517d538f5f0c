// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Timestamps (registered days)
//! - Weight-lifting entries
//! - Running entries
//!
//! Workout writes and deletes do not use Firestore transactions; they run
//! as independent steps in a fixed order.
//! A failure part way through leaves the earlier steps in place: a day can
//! stay registered with only some of its activities, or lose its activities
//! while remaining registered. Every step is idempotent, so repeating the
//! request converges.

use crate::config::Config;
use crate::db::collections;
use crate::error::StoreError;
use crate::models::{RunningEntry, Timestamp, TimestampRecord, WeightLiftingEntry, Workout};
use firestore::errors::FirestoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    timeout: Duration,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(config: &Config) -> Result<Self, StoreError> {
        let project_id = config.gcp_project_id.as_str();
        let timeout = config.store_timeout;

        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, timeout).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            timeout,
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        project_id: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
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
            StoreError::Unavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            timeout,
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client.as_ref().ok_or_else(|| {
            StoreError::Unavailable("Database not connected (offline mode)".to_string())
        })
    }

    /// Run one Firestore round trip under the configured timeout.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout {
                operation,
                after: self.timeout,
            })?
    }

    // ─── Timestamp Operations ────────────────────────────────────

    /// List every registered timestamp, in storage order.
    pub async fn list_timestamps(&self) -> Result<Vec<Timestamp>, StoreError> {
        let client = self.get_client()?;

        let records: Vec<TimestampRecord> = self
            .bounded("list timestamps", async {
                client
                    .fluent()
                    .select()
                    .from(collections::TIMESTAMPS)
                    .obj::<TimestampRecord>()
                    .query()
                    .await
                    .map_err(store_error)
            })
            .await?;

        Ok(records.into_iter().map(|r| r.timestamp).collect())
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Register a day and write the activities it carries.
    ///
    /// Steps run in order: timestamp, weight lifting, running. The first
    /// failure is returned and earlier steps are left in place.
    pub async fn upsert_workout(&self, workout: &Workout) -> Result<(), StoreError> {
        if workout.timestamp == 0 {
            return Err(StoreError::Constraint(
                "timestamp must be non-zero".to_string(),
            ));
        }

        let workout = workout.clone().stamped();
        let doc_id = workout.timestamp.to_string();

        // 1. Register the day (idempotent: same document ID every time)
        let record = TimestampRecord {
            timestamp: workout.timestamp,
        };
        self.write("register timestamp", collections::TIMESTAMPS, &doc_id, &record)
            .await?;

        // 2. Weight lifting replaces any stored entry
        if let Some(lifting) = &workout.weight_lifting {
            self.write(
                "write weight lifting",
                collections::WEIGHT_LIFTING,
                &doc_id,
                lifting,
            )
            .await?;
        }

        // 3. Running replaces any stored entry
        if let Some(running) = &workout.running {
            self.write("write running", collections::RUNNING, &doc_id, running)
                .await?;
        }

        tracing::info!(
            timestamp = workout.timestamp,
            weight_lifting = workout.weight_lifting.is_some(),
            running = workout.running.is_some(),
            "Workout stored"
        );

        Ok(())
    }

    /// Look up both activities for a day.
    ///
    /// Missing documents are reported as `None`. Any query error fails the
    /// whole lookup.
    pub async fn find_workout(&self, timestamp: Timestamp) -> Result<Workout, StoreError> {
        let doc_id = timestamp.to_string();

        let (weight_lifting, running) = tokio::try_join!(
            self.read::<WeightLiftingEntry>(
                "read weight lifting",
                collections::WEIGHT_LIFTING,
                &doc_id
            ),
            self.read::<RunningEntry>("read running", collections::RUNNING, &doc_id),
        )?;

        Ok(Workout {
            timestamp,
            weight_lifting,
            running,
        })
    }

    /// Delete a day and everything logged under it.
    ///
    /// Order: weight lifting, running, timestamp. Deleting an unknown day
    /// succeeds. Stages completed before a failure are not restored.
    pub async fn delete_workout(&self, timestamp: Timestamp) -> Result<(), StoreError> {
        let doc_id = timestamp.to_string();

        for (operation, collection) in [
            ("delete weight lifting", collections::WEIGHT_LIFTING),
            ("delete running", collections::RUNNING),
            ("delete timestamp", collections::TIMESTAMPS),
        ] {
            self.remove(operation, collection, &doc_id).await?;
            tracing::debug!(timestamp, collection, "Deleted documents");
        }

        tracing::info!(timestamp, "Workout deleted");

        Ok(())
    }

    // ─── Helper Methods ──────────────────────────────────────────

    /// Create or replace one document.
    async fn write<T>(
        &self,
        operation: &'static str,
        collection: &str,
        doc_id: &str,
        object: &T,
    ) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let client = self.get_client()?;

        self.bounded(operation, async {
            let _: () = client
                .fluent()
                .update()
                .in_col(collection)
                .document_id(doc_id)
                .object(object)
                .execute()
                .await
                .map_err(store_error)?;
            Ok(())
        })
        .await
    }

    /// Fetch one document by ID.
    async fn read<T>(
        &self,
        operation: &'static str,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        let client = self.get_client()?;

        self.bounded(operation, async {
            client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj::<T>()
                .one(doc_id)
                .await
                .map_err(store_error)
        })
        .await
    }

    /// Delete one document by ID. Missing documents are not an error.
    async fn remove(
        &self,
        operation: &'static str,
        collection: &str,
        doc_id: &str,
    ) -> Result<(), StoreError> {
        let client = self.get_client()?;

        self.bounded(operation, async {
            client
                .fluent()
                .delete()
                .from(collection)
                .document_id(doc_id)
                .execute()
                .await
                .map_err(store_error)
        })
        .await
    }
}

fn store_error(err: FirestoreError) -> StoreError {
    match &err {
        FirestoreError::DataConflictError(_) => StoreError::Constraint(err.to_string()),
        _ => StoreError::Unavailable(err.to_string()),
    }
}
