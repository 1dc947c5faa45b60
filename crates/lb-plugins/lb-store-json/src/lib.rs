//! # lb-store-json
//! likeboard/crates/lb-plugins/lb-store-json/src/lib.rs
//! JSON-file implementation of `RecordStore`.
//! Features: one file per database, named collections, shallow-merge patches.
//!
//! The whole database is held in memory and rewritten to disk after every
//! mutation; a mutation becomes visible only once its write succeeded.
//! Counter updates arrive as absolute values from the client, so two
//! concurrent votes on the same thread resolve last-write-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use lb_core::error::{AppError, Result};
use lb_core::traits::RecordStore;
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;

/// Collections present in a freshly created data file.
pub const DEFAULT_COLLECTIONS: &[&str] = &["threads"];

type Collections = BTreeMap<String, Vec<Value>>;

pub struct JsonFileStore {
    /// Data file (e.g., "./data.json")
    path: PathBuf,
    db: RwLock<Collections>,
}

impl JsonFileStore {
    /// Opens the data file, creating it with empty default collections when missing.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        let db = if fs::try_exists(&path).await? {
            let raw = fs::read(&path).await?;
            let db: Collections = serde_json::from_slice(&raw)?;
            log::info!("loaded {} collection(s) from {}", db.len(), path.display());
            db
        } else {
            let db: Collections = DEFAULT_COLLECTIONS
                .iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect();
            write_db(&path, &db).await?;
            log::info!("created data file {}", path.display());
            db
        };

        Ok(Self {
            path,
            db: RwLock::new(db),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `staged` and only then makes it the live state, so a failed
    /// write leaves memory and disk agreeing on the previous contents.
    async fn swap_in(&self, live: &mut Collections, staged: Collections) -> Result<()> {
        write_db(&self.path, &staged).await.map_err(|e| {
            log::error!("failed to persist {}: {}", self.path.display(), e);
            AppError::Internal(e.to_string())
        })?;
        *live = staged;
        Ok(())
    }
}

/// Writes to a sibling temp file and renames it over the target.
async fn write_db(path: &Path, db: &Collections) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(db)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, &bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn doc_id(doc: &Value) -> Option<i64> {
    doc.get("id").and_then(Value::as_i64)
}

fn collection_not_found(collection: &str) -> AppError {
    AppError::NotFound("collection".into(), collection.into())
}

fn doc_not_found(collection: &str, id: i64) -> AppError {
    AppError::NotFound(collection.into(), id.to_string())
}

fn find<'a>(docs: &'a mut [Value], id: i64) -> Option<&'a mut Value> {
    docs.iter_mut().find(|doc| doc_id(doc) == Some(id))
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>> {
        let db = self.db.read().await;
        db.get(collection)
            .cloned()
            .ok_or_else(|| collection_not_found(collection))
    }

    async fn get(&self, collection: &str, id: i64) -> Result<Value> {
        let db = self.db.read().await;
        let docs = db
            .get(collection)
            .ok_or_else(|| collection_not_found(collection))?;
        docs.iter()
            .find(|doc| doc_id(doc) == Some(id))
            .cloned()
            .ok_or_else(|| doc_not_found(collection, id))
    }

    /// Inserts a document. A missing id becomes the current epoch millisecond,
    /// bumped past the highest existing id if needed.
    async fn create(&self, collection: &str, mut doc: Value) -> Result<Value> {
        let fields = doc
            .as_object_mut()
            .ok_or_else(|| AppError::ValidationError("document must be a JSON object".into()))?;

        let given = match fields.get("id") {
            Some(raw) => Some(
                raw.as_i64()
                    .ok_or_else(|| AppError::ValidationError("id must be an integer".into()))?,
            ),
            None => None,
        };

        let mut db = self.db.write().await;
        let mut staged = db.clone();
        let docs = staged.entry(collection.to_string()).or_default();

        let id = match given {
            Some(id) => {
                if docs.iter().any(|d| doc_id(d) == Some(id)) {
                    return Err(AppError::Conflict(format!("duplicate id {} in {}", id, collection)));
                }
                id
            }
            None => {
                let next = docs.iter().filter_map(doc_id).max().map_or(0, |max| max + 1);
                let id = Utc::now().timestamp_millis().max(next);
                fields.insert("id".into(), Value::from(id));
                id
            }
        };

        docs.push(doc.clone());
        self.swap_in(&mut db, staged).await?;
        log::info!("created {}/{}", collection, id);
        Ok(doc)
    }

    async fn patch(&self, collection: &str, id: i64, partial: Value) -> Result<Value> {
        let Value::Object(partial) = partial else {
            return Err(AppError::ValidationError("patch must be a JSON object".into()));
        };

        let mut db = self.db.write().await;
        let mut staged = db.clone();
        let docs = staged
            .get_mut(collection)
            .ok_or_else(|| collection_not_found(collection))?;
        let target = find(docs, id).ok_or_else(|| doc_not_found(collection, id))?;

        if let Some(fields) = target.as_object_mut() {
            for (key, value) in partial {
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }
        let updated = target.clone();

        self.swap_in(&mut db, staged).await?;
        log::debug!("patched {}/{}", collection, id);
        Ok(updated)
    }

    async fn delete(&self, collection: &str, id: i64) -> Result<()> {
        let mut db = self.db.write().await;
        let mut staged = db.clone();
        let docs = staged
            .get_mut(collection)
            .ok_or_else(|| collection_not_found(collection))?;
        let before = docs.len();
        docs.retain(|doc| doc_id(doc) != Some(id));
        if docs.len() == before {
            return Err(doc_not_found(collection, id));
        }

        self.swap_in(&mut db, staged).await?;
        log::info!("deleted {}/{}", collection, id);
        Ok(())
    }
}
