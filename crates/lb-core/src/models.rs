//! # Domain Models
//!
//! These structs represent the documents exchanged with the Record Store.
//! Field names follow the camelCase JSON layout of the stored documents.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Thread ids are creation timestamps in epoch milliseconds.
pub type ThreadId = i64;

/// Name shown when a thread carries no author.
pub const ANONYMOUS: &str = "Anonymous";

/// A single posted message with its vote counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dislikes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub voters: Vec<VoterId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Any document may be patched into the store, so `null` counters read as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Thread {
    /// The author as displayed, falling back to [`ANONYMOUS`] when blank.
    pub fn author_name(&self) -> &str {
        match self.author.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS,
        }
    }

    /// Creation time, or the id read as epoch milliseconds for older documents.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .or_else(|| DateTime::from_timestamp_millis(self.id))
    }
}

/// Body of `POST /api/threads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThread {
    pub id: ThreadId,
    pub content: String,
    pub author: String,
    pub likes: u64,
    pub dislikes: u64,
    pub voters: Vec<VoterId>,
    pub created_at: DateTime<Utc>,
}

impl NewThread {
    /// A fresh thread with zeroed counters, stamped with `now`.
    pub fn new(content: impl Into<String>, author: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            content: content.into(),
            author: author.into(),
            likes: 0,
            dislikes: 0,
            voters: Vec::new(),
            created_at: now,
        }
    }
}

/// Partial update sent as `PATCH /api/threads/:id`.
///
/// Only the counter being incremented is present; the store merges the
/// remaining fields untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<u64>,
    pub voters: Vec<VoterId>,
}

impl ThreadPatch {
    /// Applies the patch to a local snapshot, mirroring the store's merge.
    pub fn apply_to(&self, thread: &mut Thread) {
        if let Some(likes) = self.likes {
            thread.likes = likes;
        }
        if let Some(dislikes) = self.dislikes {
            thread.dislikes = dislikes;
        }
        thread.voters = self.voters.clone();
    }
}

/// Anonymous per-device token used to deduplicate votes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Random hex token suffixed with the creation time in milliseconds.
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("{}{}", Uuid::new_v4().simple(), now.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which way a vote goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Like,
    Dislike,
}

impl Polarity {
    pub fn opposite(self) -> Self {
        match self {
            Polarity::Like => Polarity::Dislike,
            Polarity::Dislike => Polarity::Like,
        }
    }

    /// Prefix used for the local flag key (`liked_` / `disliked_`).
    pub fn flag_prefix(self) -> &'static str {
        match self {
            Polarity::Like => "liked",
            Polarity::Dislike => "disliked",
        }
    }
}

/// Local evidence that a voter already cast `polarity` on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteRecord {
    pub thread_id: ThreadId,
    pub voter: VoterId,
    pub polarity: Polarity,
}

impl VoteRecord {
    /// Key under which the flag lives in the local store,
    /// e.g. `liked_1700000000000_abc`.
    pub fn key(&self) -> String {
        flag_key(self.thread_id, &self.voter, self.polarity)
    }
}

pub(crate) fn flag_key(thread_id: ThreadId, voter: &VoterId, polarity: Polarity) -> String {
    format!("{}_{}_{}", polarity.flag_prefix(), thread_id, voter)
}

/// This voter's prior vote on a thread, as shown in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteState {
    #[default]
    None,
    Liked,
    Disliked,
}
