//! Per-topic learner progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Conventional unit statuses. The store accepts any string.
pub mod status {
    pub const LOCKED: &str = "locked";
    pub const UNLOCKED: &str = "unlocked";
    pub const COMPLETED: &str = "completed";
}

/// Progress for one topic, stored at `users/{uid}/progress/{topic}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Status per unit ID (e.g. `"L1U1" -> "completed"`, see [`UnitId`](crate::models::UnitId))
    #[serde(default)]
    pub units: BTreeMap<String, String>,
    /// Coin balance for the topic
    #[serde(default)]
    pub coins: i64,
    /// Unit the learner is currently working on
    #[serde(default)]
    pub active_unit_id: Option<String>,
    /// Server time of the last write
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ProgressRecord {
    /// Status of a unit, treating unknown units as locked.
    pub fn status_of(&self, unit_id: &str) -> &str {
        self.units
            .get(unit_id)
            .map(String::as_str)
            .unwrap_or(status::LOCKED)
    }
}
