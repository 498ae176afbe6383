// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store with Firestore update-mask semantics.
//!
//! Documents are JSON objects keyed by their full path
//! (`users/u1/progress/Algebra`). Used for offline sessions and tests.

use crate::db::field_path;
use crate::time_utils::now_rfc3339;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Shared in-memory document map. Clones see the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<DashMap<String, Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a document by path.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.docs
            .get(path)
            .map(|doc| Value::Object(doc.value().clone()))
    }

    /// Apply a masked write.
    ///
    /// For every path in `fields`: if `source` has a value at that path it is
    /// stored there (creating intermediate maps), otherwise the stored field
    /// is removed. Fields outside the mask are never touched. The document is
    /// created if it does not exist.
    ///
    /// Each path in `server_times` is then set to the current time, standing
    /// in for Firestore's request-time transform.
    pub fn merge(&self, path: &str, source: &Value, fields: &[String], server_times: &[&str]) {
        let mut doc = self.docs.entry(path.to_string()).or_default();

        for field in fields {
            let segments = field_path::split(field);
            match lookup(source, &segments) {
                Some(value) => set_path(doc.value_mut(), &segments, value.clone()),
                None => remove_path(doc.value_mut(), &segments),
            }
        }

        if !server_times.is_empty() {
            let now = Value::String(now_rfc3339());
            for field in server_times {
                set_path(doc.value_mut(), &field_path::split(field), now.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

fn lookup<'v>(value: &'v Value, segments: &[String]) -> Option<&'v Value> {
    segments
        .iter()
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

fn set_path(doc: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = doc;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("intermediate field was just replaced with a map"),
        };
    }
    current.insert(last.clone(), value);
}

fn remove_path(doc: &mut Map<String, Value>, segments: &[String]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = doc;
    for segment in parents {
        current = match current.get_mut(segment) {
            Some(Value::Object(map)) => map,
            _ => return,
        };
    }
    current.remove(last);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_merge_creates_document() {
        let store = MemoryStore::new();
        store.merge("users/a", &json!({"email": "a@b.com"}), &fields(&["email"]), &[]);

        assert_eq!(store.get("users/a"), Some(json!({"email": "a@b.com"})));
        assert_eq!(store.get("users/b"), None);
    }

    #[test]
    fn test_fields_outside_mask_untouched() {
        let store = MemoryStore::new();
        store.merge(
            "users/a",
            &json!({"email": "old", "created_at": "t0"}),
            &fields(&["email", "created_at"]),
            &[],
        );
        store.merge(
            "users/a",
            &json!({"email": "new", "created_at": "t1"}),
            &fields(&["email"]),
            &[],
        );

        assert_eq!(
            store.get("users/a"),
            Some(json!({"email": "new", "created_at": "t0"}))
        );
    }

    #[test]
    fn test_nested_map_entries_merge() {
        let store = MemoryStore::new();
        store.merge(
            "p",
            &json!({"units": {"L1U1": "completed", "L1U2": "unlocked"}}),
            &fields(&["units.L1U1", "units.L1U2"]),
            &[],
        );
        store.merge(
            "p",
            &json!({"units": {"L1U2": "completed", "unit 3": "unlocked"}}),
            &fields(&["units.L1U2", "units.`unit 3`"]),
            &[],
        );

        assert_eq!(
            store.get("p"),
            Some(json!({"units": {
                "L1U1": "completed",
                "L1U2": "completed",
                "unit 3": "unlocked"
            }}))
        );
    }

    #[test]
    fn test_masked_field_missing_from_source_is_removed() {
        let store = MemoryStore::new();
        store.merge("d", &json!({"a": 1, "b": 2}), &fields(&["a", "b"]), &[]);
        store.merge("d", &json!({"a": 3}), &fields(&["a", "b"]), &[]);

        assert_eq!(store.get("d"), Some(json!({"a": 3})));
    }

    #[test]
    fn test_server_times_stamped_on_merge() {
        let store = MemoryStore::new();
        store.merge(
            "d",
            &json!({"coins": 1, "updated_at": "client"}),
            &fields(&["coins"]),
            &["updated_at"],
        );

        let doc = store.get("d").unwrap();
        assert_eq!(doc["coins"], 1);
        let stamped = doc["updated_at"].as_str().unwrap();
        assert_ne!(stamped, "client");
        assert!(stamped.ends_with('Z'));
    }

    #[test]
    fn test_null_is_stored() {
        let store = MemoryStore::new();
        store.merge("d", &json!({"active_unit_id": null}), &fields(&["active_unit_id"]), &[]);

        assert_eq!(store.get("d"), Some(json!({"active_unit_id": null})));
        assert_eq!(store.len(), 1);
    }
}
