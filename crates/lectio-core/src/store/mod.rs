//! Versioned document storage.
//!
//! Every mutable entity (plans, progress, streaks, rooms) lives in a
//! key-value document store behind the [`DocumentStore`] trait. Writes
//! to existing documents go through compare-and-swap on a per-document
//! version; blind get-then-put overwrites are not part of the contract,
//! which is what makes the trackers' read-modify-write loops safe under
//! concurrent callers.

pub mod memory;
pub mod sqlite;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored document: an opaque JSON body plus its write version.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    /// Starts at 1 on insert, incremented by every successful swap.
    pub version: u64,
    pub body: Value,
}

impl Document {
    /// Decode the body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.body.clone()).map_err(|e| StoreError::CorruptDocument {
            key: self.key.clone(),
            message: e.to_string(),
        })
    }
}

/// Durable per-entity storage with atomic conditional update.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Document>, StoreError>;

    /// Store a new document at version 1 only if the key is absent.
    /// Returns whether the insert happened.
    fn insert(&self, key: &str, body: Value) -> Result<bool, StoreError>;

    /// Replace a document's body only if its version still equals
    /// `expected_version`. Returns whether the swap happened; a `false`
    /// means a concurrent writer got there first and the caller should
    /// re-read.
    fn compare_and_swap(
        &self,
        key: &str,
        expected_version: u64,
        body: Value,
    ) -> Result<bool, StoreError>;

    /// All documents whose key starts with `prefix`, in key order.
    fn list(&self, prefix: &str) -> Result<Vec<Document>, StoreError>;
}

/// Key namespace shared by all components.
pub mod keys {
    use uuid::Uuid;

    pub const PLAN_PREFIX: &str = "plan/";
    pub const ROOM_PREFIX: &str = "room/";

    pub fn plan(id: Uuid) -> String {
        format!("plan/{id}")
    }

    /// Uniqueness index: claims a plan display name for a plan id.
    pub fn plan_name(name: &str) -> String {
        format!("plan-name/{name}")
    }

    pub fn progress(user: &str, plan_id: Uuid) -> String {
        format!("progress/{user}/{plan_id}")
    }

    pub fn progress_prefix(user: &str) -> String {
        format!("progress/{user}/")
    }

    pub fn streak(user: &str) -> String {
        format!("streak/{user}")
    }

    pub fn room(id: Uuid) -> String {
        format!("room/{id}")
    }
}
