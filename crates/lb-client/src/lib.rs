//! # lb-client
//!
//! The browser-side flow in library form: load the feed, post a thread,
//! vote through the ledger. One request per action, no retries, no timeouts.

pub mod error;
pub mod feed;
pub mod gateway;

use chrono::Utc;
use lb_core::ledger::{VoteLedger, VoteRejection};
use lb_core::models::{NewThread, Polarity, Thread};
use lb_core::traits::LocalStore;

pub use error::ClientError;
pub use feed::FeedEntry;
pub use gateway::{HttpGateway, StoreGateway, ThreadGateway};

/// What happened to a vote attempt that did not fail in transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The store accepted the patch; carries the updated thread.
    Counted(Thread),
    /// The ledger refused the vote and no request was made.
    Rejected(VoteRejection),
}

pub struct BoardClient<G, S> {
    gateway: G,
    ledger: VoteLedger<S>,
}

impl<G: ThreadGateway, S: LocalStore> BoardClient<G, S> {
    pub fn new(gateway: G, ledger: VoteLedger<S>) -> Self {
        Self { gateway, ledger }
    }

    pub fn ledger(&self) -> &VoteLedger<S> {
        &self.ledger
    }

    /// All threads newest first, each marked with this voter's prior vote.
    pub async fn load_feed(&self) -> Result<Vec<FeedEntry>, ClientError> {
        let mut threads = self.gateway.list_threads().await.map_err(|e| {
            log::error!("failed to load threads: {}", e);
            e
        })?;
        feed::sort_newest_first(&mut threads);
        Ok(feed::annotate(threads, &self.ledger))
    }

    /// Posts a thread. Blank content is dropped without a request and yields `None`.
    pub async fn submit_post(&self, content: &str, author: &str) -> Result<Option<Thread>, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let thread = NewThread::new(content, author.trim(), Utc::now());
        let created = self.gateway.create_thread(&thread).await.map_err(|e| {
            log::error!("failed to create thread: {}", e);
            e
        })?;
        Ok(Some(created))
    }

    /// Casts a vote from the given snapshot.
    ///
    /// The local flag is only written once the store accepted the patch.
    pub async fn vote(&self, thread: &Thread, polarity: Polarity) -> Result<VoteOutcome, ClientError> {
        let ballot = match self.ledger.cast_vote(thread, polarity) {
            Ok(ballot) => ballot,
            Err(reason) => {
                log::debug!("vote on {} refused: {}", thread.id, reason);
                return Ok(VoteOutcome::Rejected(reason));
            }
        };

        let updated = self
            .gateway
            .patch_thread(thread.id, &ballot.patch)
            .await
            .map_err(|e| {
                log::error!("failed to {:?} thread {}: {}", polarity, thread.id, e);
                e
            })?;

        self.ledger.commit(&ballot.record)?;
        Ok(VoteOutcome::Counted(updated))
    }
}
