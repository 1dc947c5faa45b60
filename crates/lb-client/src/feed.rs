//! Display rows for the thread feed.

use chrono::Local;
use lb_core::ledger::VoteLedger;
use lb_core::models::{Thread, VoteState};
use lb_core::traits::LocalStore;

/// One thread as the page shows it, with this voter's prior vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub thread: Thread,
    pub vote: VoteState,
}

impl FeedEntry {
    pub fn author_name(&self) -> &str {
        self.thread.author_name()
    }

    /// Upper-cased first letter of the author, for the avatar.
    pub fn initial(&self) -> String {
        self.author_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// Local `HH:MM` of the creation time.
    pub fn time_label(&self) -> String {
        self.thread
            .timestamp()
            .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_default()
    }

    pub fn liked(&self) -> bool {
        self.vote == VoteState::Liked
    }

    pub fn disliked(&self) -> bool {
        self.vote == VoteState::Disliked
    }
}

/// Newest first. The sort is stable, so equal ids keep insertion order.
pub fn sort_newest_first(threads: &mut [Thread]) {
    threads.sort_by(|a, b| b.id.cmp(&a.id));
}

pub fn annotate<S: LocalStore>(threads: Vec<Thread>, ledger: &VoteLedger<S>) -> Vec<FeedEntry> {
    threads
        .into_iter()
        .map(|thread| FeedEntry {
            vote: ledger.vote_state(thread.id),
            thread,
        })
        .collect()
}
