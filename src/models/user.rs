//! User profile model for storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// User profile stored in Firestore at `users/{uid}`.
///
/// The user ID is the document ID and is not repeated inside the document.
/// Known fields are typed; a field absent from the document stays `None`.
/// Everything else stored on the document is carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name from the identity provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Profile photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Server time of the first upsert, never changed afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Server time of the most recent upsert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// What `upsert_profile` reports back: exactly the caller's inputs.
///
/// Store-assigned timestamps are not included; read the profile to see them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}
