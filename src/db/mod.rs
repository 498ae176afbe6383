//! Database layer (Firestore).

pub mod field_path;
pub mod firestore;
pub mod memory;
mod profiles;
mod progress;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Per-topic progress, nested under each user document
    pub const PROGRESS: &str = "progress";
}
