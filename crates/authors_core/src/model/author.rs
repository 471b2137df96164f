//! Author domain model.
//!
//! # Responsibility
//! - Define the persisted author record and its create/update payload.
//! - Payloads are passed to stores as given; the store owns constraints.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never change.
//! - `id` is never reused for another author.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of an author.
pub type AuthorId = Uuid;

/// Persisted author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub email: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Author {
    /// Builds a fully-formed record with a fresh id and the current time.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            created_at: now_epoch_ms(),
        }
    }

    /// Returns the writable fields of this record as a payload.
    pub fn to_payload(&self) -> NewAuthor {
        NewAuthor {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Writable author fields, used by both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub email: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

/// Case-insensitive substring test shared by every store adapter.
///
/// Uses Unicode lowercasing on both sides, so it does not depend on any
/// database collation.
pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
