//! Database layer (Firestore).
//!
//! Every document ID is the decimal Timestamp, so document-ID uniqueness
//! enforces at most one record per Timestamp in each collection.

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const TIMESTAMPS: &str = "timestamps";
    pub const WEIGHT_LIFTING: &str = "weight_lifting";
    pub const RUNNING: &str = "running";
}
