// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress operations on `users/{uid}/progress/{topic}`.

use crate::db::firestore::{require_id, DocPath};
use crate::db::{collections, field_path, FirestoreDb};
use crate::error::AppError;
use crate::models::ProgressRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize)]
struct ProgressWrite {
    units: BTreeMap<String, String>,
    coins: i64,
    active_unit_id: Option<String>,
}

/// Document location for a topic.
fn progress_doc(uid: &str, topic: &str) -> DocPath {
    DocPath::nested(
        collections::USERS,
        uid,
        collections::PROGRESS,
        topic_doc_id(topic),
    )
}

/// Document ID for a topic name.
///
/// The name is used as-is except where Firestore forbids it: `/` is
/// written as `%2F` (and `%` as `%25` so distinct names stay distinct),
/// and the reserved IDs `.`, `..` and `__name__` get their first
/// character escaped.
fn topic_doc_id(topic: &str) -> String {
    let mut id = String::with_capacity(topic.len());
    for c in topic.chars() {
        match c {
            '%' => id.push_str("%25"),
            '/' => id.push_str("%2F"),
            _ => id.push(c),
        }
    }

    let reserved = id == "."
        || id == ".."
        || (id.len() >= 4 && id.starts_with("__") && id.ends_with("__"));
    if reserved {
        let (first, rest) = id.split_at(1);
        let escaped = if first == "." { "%2E" } else { "%5F" };
        id = format!("{}{}", escaped, rest);
    }
    id
}

impl FirestoreDb {
    // ─── Progress Operations ─────────────────────────────────────

    /// Get progress for a topic, `None` if nothing was saved yet.
    pub async fn get_progress(
        &self,
        uid: &str,
        topic: &str,
    ) -> Result<Option<ProgressRecord>, AppError> {
        require_id("uid", uid)?;
        require_id("topic", topic)?;
        self.read_doc(&progress_doc(uid, topic)).await
    }

    /// Save progress for a topic.
    ///
    /// Each entry in `units` is written on its own, so units missing from
    /// `units` keep their stored status. `coins` and `active_unit_id` are
    /// always overwritten.
    pub async fn save_progress(
        &self,
        uid: &str,
        topic: &str,
        units: &BTreeMap<String, String>,
        coins: i64,
        active_unit_id: Option<&str>,
    ) -> Result<(), AppError> {
        require_id("uid", uid)?;
        require_id("topic", topic)?;

        let write = ProgressWrite {
            units: units.clone(),
            coins,
            active_unit_id: active_unit_id.map(str::to_string),
        };

        let mut fields: Vec<String> = ["coins", "active_unit_id"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        fields.extend(
            units
                .keys()
                .map(|unit_id| field_path::join(&["units", unit_id.as_str()])),
        );

        self.merge_doc(&progress_doc(uid, topic), &write, fields, &["updated_at"])
            .await?;

        tracing::info!(
            uid,
            topic,
            coins,
            units = units.len(),
            "Progress saved"
        );
        Ok(())
    }
}
