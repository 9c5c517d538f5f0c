// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness-Log: record weight-lifting and running sessions per day
//!
//! This crate provides the backend API that decodes workout submissions
//! and keeps them in Firestore, keyed by timestamp.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod payload;
pub mod routes;

use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub db: FirestoreDb,
}
