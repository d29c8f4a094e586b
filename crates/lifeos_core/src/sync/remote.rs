//! Remote module-document contract.
//!
//! # Responsibility
//! - Define the `RemoteStore` seam the reconciler drives, keyed by
//!   `(module, user_id)`.
//! - Carry transport failures in a structured envelope with a retry hint.
//!
//! # Invariants
//! - `load` distinguishes "no document yet" (`Ok(None)`) from transport
//!   failure (`Err`); callers must never conflate the two.
//! - `save` fully replaces the stored document for the key.
//!
//! # See also
//! - docs/architecture/sync.md

use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Structured remote failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStoreError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl RemoteStoreError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            code: "transient".to_string(),
            message: message.into(),
            retryable: true,
        }
    }

    pub fn permanent(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable: false,
        }
    }
}

impl Display for RemoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "remote store error [{}] retryable={}: {}",
            self.code, self.retryable, self.message
        )
    }
}

impl Error for RemoteStoreError {}

/// Per-(module, user) JSON document storage.
pub trait RemoteStore: Send + Sync {
    /// Loads the stored document, `Ok(None)` when none exists.
    fn load(&self, module: &str, user_id: &str) -> Result<Option<Value>, RemoteStoreError>;

    /// Replaces the stored document for `(module, user_id)`.
    fn save(&self, module: &str, user_id: &str, data: &Value) -> Result<(), RemoteStoreError>;
}

/// Map-backed remote store for tests and offline operation.
#[derive(Default)]
pub struct InMemoryRemoteStore {
    documents: Mutex<HashMap<(String, String), Value>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().expect("remote map lock poisoned").len()
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn load(&self, module: &str, user_id: &str) -> Result<Option<Value>, RemoteStoreError> {
        let documents = self.documents.lock().expect("remote map lock poisoned");
        Ok(documents
            .get(&(module.to_string(), user_id.to_string()))
            .cloned())
    }

    fn save(&self, module: &str, user_id: &str, data: &Value) -> Result<(), RemoteStoreError> {
        let mut documents = self.documents.lock().expect("remote map lock poisoned");
        documents.insert((module.to_string(), user_id.to_string()), data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryRemoteStore, RemoteStore, RemoteStoreError};
    use serde_json::json;

    #[test]
    fn missing_document_is_none_not_error() {
        let store = InMemoryRemoteStore::new();
        let loaded = store.load("people", "user-1").expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn save_replaces_whole_document() {
        let store = InMemoryRemoteStore::new();
        store
            .save("people", "user-1", &json!({"relationships": [1, 2]}))
            .expect("first save");
        store
            .save("people", "user-1", &json!({"relationships": []}))
            .expect("second save");

        let loaded = store.load("people", "user-1").expect("load").expect("doc");
        assert_eq!(loaded, json!({"relationships": []}));
        assert_eq!(store.document_count(), 1);
    }

    #[test]
    fn error_envelope_carries_retry_hint() {
        let transient = RemoteStoreError::transient("timeout");
        assert!(transient.retryable);
        let permanent = RemoteStoreError::permanent("forbidden", "row level security");
        assert!(!permanent.retryable);
    }
}
