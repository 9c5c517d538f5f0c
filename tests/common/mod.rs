// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fitness_log::config::Config;
use fitness_log::db::FirestoreDb;
use fitness_log::routes::create_router;
use fitness_log::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    test_db_for_project("test-project").await
}

/// Create a test database connection to a specific emulator project.
///
/// Each emulator project is an independent, initially empty database.
#[allow(dead_code)]
pub async fn test_db_for_project(project_id: &str) -> FirestoreDb {
    let config = Config {
        gcp_project_id: project_id.to_string(),
        ..Config::default()
    };
    FirestoreDb::new(&config)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Generate a unique timestamp for test isolation.
#[allow(dead_code)]
pub fn unique_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        db: test_db_offline(),
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> axum::Router {
    let state = Arc::new(AppState {
        db: test_db().await,
    });

    create_router(state)
}
