//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary or the client.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Generic JSON-document persistence, grouped in named collections.
///
/// Documents are JSON objects keyed by an integer `id`. The store performs no
/// validation of document contents beyond that.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All documents of a collection, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Value>>;

    async fn get(&self, collection: &str, id: i64) -> Result<Value>;

    /// Inserts a document, assigning an `id` when the body carries none.
    async fn create(&self, collection: &str, doc: Value) -> Result<Value>;

    /// Shallow merge of `partial` into the stored document. Fields absent
    /// from `partial` are left untouched; `id` cannot be changed.
    async fn patch(&self, collection: &str, id: i64, partial: Value) -> Result<Value>;

    async fn delete(&self, collection: &str, id: i64) -> Result<()>;
}

/// Per-device string key-value storage (the client's "localStorage").
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T: LocalStore + ?Sized> LocalStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value)
    }
}
