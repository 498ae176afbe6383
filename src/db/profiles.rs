// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile operations on `users/{uid}`.

use crate::db::collections;
use crate::db::firestore::{is_metadata_field, require_id, DocPath};
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ProfileSummary, UserProfile};
use serde::{Deserialize, Serialize};

/// Caller-supplied fields of an upsert. Timestamps are set by the store.
#[derive(Serialize, Deserialize)]
struct ProfileWrite {
    email: String,
    display_name: String,
    photo_url: Option<String>,
}

impl FirestoreDb {
    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user profile, `None` if the user has never logged in.
    ///
    /// Stored fields beyond the known ones are returned in `extra`.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        require_id("uid", uid)?;
        let profile: Option<UserProfile> =
            self.read_doc(&DocPath::new(collections::USERS, uid)).await?;

        Ok(profile.map(|mut profile| {
            profile.extra.retain(|key, _| !is_metadata_field(key));
            profile
        }))
    }

    /// Create or update a user profile.
    ///
    /// `email`, `display_name`, `photo_url` and `last_login` are overwritten;
    /// `created_at` is written only when the profile has none yet. Any other
    /// stored fields are left alone.
    ///
    /// Returns the caller's inputs, not the stored document.
    pub async fn upsert_profile(
        &self,
        uid: &str,
        email: &str,
        display_name: &str,
        photo_url: Option<&str>,
    ) -> Result<ProfileSummary, AppError> {
        require_id("uid", uid)?;
        let doc = DocPath::new(collections::USERS, uid);

        let existing: Option<UserProfile> = self.read_doc(&doc).await?;
        let is_new = existing
            .as_ref()
            .map_or(true, |profile| profile.created_at.is_none());

        let write = ProfileWrite {
            email: email.to_string(),
            display_name: display_name.to_string(),
            photo_url: photo_url.map(str::to_string),
        };
        let fields = ["email", "display_name", "photo_url"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        let server_times: &[&str] = if is_new {
            &["last_login", "created_at"]
        } else {
            &["last_login"]
        };

        self.merge_doc(&doc, &write, fields, server_times).await?;
        tracing::info!(uid, created = is_new, "Profile upserted");

        Ok(ProfileSummary {
            uid: uid.to_string(),
            email: write.email,
            display_name: write.display_name,
            photo_url: write.photo_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_upsert_then_get() {
        let db = FirestoreDb::new_in_memory();

        let summary = db
            .upsert_profile("u1", "a@b.com", "Alice", None)
            .await
            .unwrap();
        assert_eq!(summary.uid, "u1");
        assert_eq!(summary.photo_url, None);

        let profile = db.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert!(profile.created_at.is_some());
        assert_eq!(profile.created_at, profile.last_login);
    }

    #[tokio::test]
    async fn test_created_at_is_write_once() {
        let db = FirestoreDb::new_in_memory();

        db.upsert_profile("u1", "a@b.com", "Alice", None)
            .await
            .unwrap();
        let first = db.get_profile("u1").await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        db.upsert_profile("u1", "alice@b.com", "Alice B", Some("https://x/p.png"))
            .await
            .unwrap();
        let second = db.get_profile("u1").await.unwrap().unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert_ne!(second.last_login, first.last_login);
        assert_eq!(second.email.as_deref(), Some("alice@b.com"));
        assert_eq!(second.display_name.as_deref(), Some("Alice B"));
        assert_eq!(second.photo_url.as_deref(), Some("https://x/p.png"));
    }

    #[tokio::test]
    async fn test_photo_url_cleared_on_upsert() {
        let db = FirestoreDb::new_in_memory();

        db.upsert_profile("u1", "a@b.com", "Alice", Some("https://x/p.png"))
            .await
            .unwrap();
        db.upsert_profile("u1", "a@b.com", "Alice", None)
            .await
            .unwrap();

        let profile = db.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.photo_url, None);
    }

    #[tokio::test]
    async fn test_unknown_fields_returned() {
        let store = MemoryStore::new();
        store.merge(
            "users/u1",
            &json!({"email": "a@b.com", "display_name": "A", "streak": 7}),
            &["email".to_string(), "display_name".to_string(), "streak".to_string()],
            &[],
        );
        let db = FirestoreDb::with_memory_store(store);

        let profile = db.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
        assert_eq!(profile.extra.get("streak"), Some(&json!(7)));
        assert_eq!(profile.created_at, None);
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"email": "a@b.com", "display_name": "A", "streak": 7})
        );

        // An upsert leaves the unknown field alone.
        db.upsert_profile("u1", "a@b.com", "A", None).await.unwrap();
        let profile = db.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.extra.get("streak"), Some(&json!(7)));
        assert!(profile.created_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_email_stays_missing() {
        let store = MemoryStore::new();
        store.merge(
            "users/u2",
            &json!({"display_name": "B"}),
            &["display_name".to_string()],
            &[],
        );
        let db = FirestoreDb::with_memory_store(store);

        let profile = db.get_profile("u2").await.unwrap().unwrap();
        assert_eq!(profile.email, None);
        assert_eq!(profile.display_name.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let db = FirestoreDb::new_in_memory();
        assert!(db.get_profile("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_uid_rejected() {
        let db = FirestoreDb::new_in_memory();
        let err = db.upsert_profile("", "a@b.com", "A", None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
