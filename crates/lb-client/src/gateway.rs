//! The client's port to the Record Store and its two adapters.

use async_trait::async_trait;
use lb_core::models::{NewThread, Thread, ThreadId, ThreadPatch};
use lb_core::traits::RecordStore;
use serde_json::Value;

use crate::error::ClientError;

/// Collection holding thread documents.
pub const THREADS: &str = "threads";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadGateway: Send + Sync {
    async fn list_threads(&self) -> Result<Vec<Thread>, ClientError>;
    async fn create_thread(&self, thread: &NewThread) -> Result<Thread, ClientError>;
    async fn patch_thread(&self, id: ThreadId, patch: &ThreadPatch) -> Result<Thread, ClientError>;
}

/// Talks to a running server over `<base>/api/threads`.
pub struct HttpGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/{}", base_url.trim_end_matches('/'), THREADS),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn ensure_ok(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Network(format!("{} responded {}", resp.url(), status)))
    }
}

#[async_trait]
impl ThreadGateway for HttpGateway {
    async fn list_threads(&self) -> Result<Vec<Thread>, ClientError> {
        let resp = self.http.get(&self.endpoint).send().await?;
        let docs: Vec<Value> = ensure_ok(resp)?.json().await?;
        Ok(decode_listing(docs))
    }

    async fn create_thread(&self, thread: &NewThread) -> Result<Thread, ClientError> {
        let resp = self.http.post(&self.endpoint).json(thread).send().await?;
        Ok(ensure_ok(resp)?.json().await?)
    }

    async fn patch_thread(&self, id: ThreadId, patch: &ThreadPatch) -> Result<Thread, ClientError> {
        let resp = self
            .http
            .patch(format!("{}/{}", self.endpoint, id))
            .json(patch)
            .send()
            .await?;
        Ok(ensure_ok(resp)?.json().await?)
    }
}

/// Calls a `RecordStore` in-process, skipping HTTP entirely.
pub struct StoreGateway<R> {
    store: R,
}

impl<R: RecordStore> StoreGateway<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }
}

fn decode(doc: Value) -> Result<Thread, ClientError> {
    serde_json::from_value(doc).map_err(|e| ClientError::Network(format!("malformed thread: {}", e)))
}

/// Decodes a listing, dropping documents that are not threads so one bad
/// record cannot hide the rest of the feed.
pub(crate) fn decode_listing(docs: Vec<Value>) -> Vec<Thread> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(doc) {
                Ok(thread) => Some(thread),
                Err(e) => {
                    log::warn!("skipping malformed thread {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn encode<T: serde::Serialize>(body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::Network(e.to_string()))
}

#[async_trait]
impl<R: RecordStore> ThreadGateway for StoreGateway<R> {
    async fn list_threads(&self) -> Result<Vec<Thread>, ClientError> {
        Ok(decode_listing(self.store.list(THREADS).await?))
    }

    async fn create_thread(&self, thread: &NewThread) -> Result<Thread, ClientError> {
        decode(self.store.create(THREADS, encode(thread)?).await?)
    }

    async fn patch_thread(&self, id: ThreadId, patch: &ThreadPatch) -> Result<Thread, ClientError> {
        decode(self.store.patch(THREADS, id, encode(patch)?).await?)
    }
}
