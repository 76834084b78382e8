//! In-memory document store.
//!
//! The reference [`DocumentStore`] implementation: a mutex-guarded map.
//! Used by tests and by embedders that don't need durability.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{Document, DocumentStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, (u64, Value)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.lock().expect("store lock poisoned");
        Ok(docs.get(key).map(|(version, body)| Document {
            key: key.to_string(),
            version: *version,
            body: body.clone(),
        }))
    }

    fn insert(&self, key: &str, body: Value) -> Result<bool, StoreError> {
        let mut docs = self.docs.lock().expect("store lock poisoned");
        if docs.contains_key(key) {
            return Ok(false);
        }
        docs.insert(key.to_string(), (1, body));
        Ok(true)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected_version: u64,
        body: Value,
    ) -> Result<bool, StoreError> {
        let mut docs = self.docs.lock().expect("store lock poisoned");
        match docs.get_mut(key) {
            Some((version, stored)) if *version == expected_version => {
                *version += 1;
                *stored = body;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<Document>, StoreError> {
        let docs = self.docs.lock().expect("store lock poisoned");
        Ok(docs
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, (version, body))| Document {
                key: key.clone(),
                version: *version,
                body: body.clone(),
            })
            .collect())
    }
}
