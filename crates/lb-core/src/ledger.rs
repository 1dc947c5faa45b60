//! # Vote Ledger
//!
//! Client-resident record of which threads this device already voted on.
//! The ledger decides whether a vote is legal and computes the patch to send;
//! it never talks to the Record Store itself.
//!
//! The store accepts any patch from any caller, so the ledger is advisory:
//! it keeps an honest client from double voting, nothing more.

use chrono::Utc;
use thiserror::Error;

use crate::models::{flag_key, Polarity, Thread, ThreadId, ThreadPatch, VoteRecord, VoteState, VoterId};
use crate::traits::LocalStore;

/// Local store key holding this device's voter token.
pub const VOTER_ID_KEY: &str = "voterId";

/// Why a vote attempt was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRejection {
    #[error("this voter already cast that vote")]
    AlreadyVoted,

    #[error("this voter already voted the other way")]
    OppositeVoteExists,

    #[error("the counter cannot go any higher")]
    CounterOverflow,
}

/// Result of a legal vote: the patch for the store and the flag to keep locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub patch: ThreadPatch,
    pub record: VoteRecord,
}

impl VoterId {
    /// Reads the persisted token, or generates and persists a new one.
    pub fn load_or_generate<S: LocalStore + ?Sized>(store: &S) -> anyhow::Result<VoterId> {
        if let Some(token) = store.get(VOTER_ID_KEY) {
            return Ok(VoterId::new(token));
        }

        let voter = VoterId::generate(Utc::now());
        store.set(VOTER_ID_KEY, voter.as_str())?;
        log::info!("generated new voter id {}", voter);
        Ok(voter)
    }
}

pub struct VoteLedger<S> {
    voter: VoterId,
    store: S,
}

impl<S: LocalStore> VoteLedger<S> {
    pub fn new(voter: VoterId, store: S) -> Self {
        Self { voter, store }
    }

    /// Loads (or creates) the device's voter id from `store` and builds a ledger on it.
    pub fn open(store: S) -> anyhow::Result<Self> {
        let voter = VoterId::load_or_generate(&store)?;
        Ok(Self::new(voter, store))
    }

    pub fn voter(&self) -> &VoterId {
        &self.voter
    }

    fn has_flag(&self, thread_id: ThreadId, polarity: Polarity) -> bool {
        self.store.contains(&flag_key(thread_id, &self.voter, polarity))
    }

    /// Decides whether this voter may cast `polarity` on the thread.
    ///
    /// An opposite vote is reported ahead of a repeated one.
    pub fn check(&self, thread_id: ThreadId, polarity: Polarity) -> Result<(), VoteRejection> {
        if self.has_flag(thread_id, polarity.opposite()) {
            return Err(VoteRejection::OppositeVoteExists);
        }
        if self.has_flag(thread_id, polarity) {
            return Err(VoteRejection::AlreadyVoted);
        }
        Ok(())
    }

    pub fn can_vote(&self, thread_id: ThreadId, polarity: Polarity) -> bool {
        self.check(thread_id, polarity).is_ok()
    }

    /// Computes the counter increment and voter append for `thread`.
    ///
    /// Nothing is persisted; the caller sends the patch and then [`commit`]s
    /// the record once the store accepted it.
    ///
    /// [`commit`]: VoteLedger::commit
    pub fn cast_vote(&self, thread: &Thread, polarity: Polarity) -> Result<Ballot, VoteRejection> {
        self.check(thread.id, polarity)?;

        let mut voters = thread.voters.clone();
        if !voters.contains(&self.voter) {
            voters.push(self.voter.clone());
        }

        let counter = match polarity {
            Polarity::Like => thread.likes,
            Polarity::Dislike => thread.dislikes,
        };
        let bumped = counter.checked_add(1).ok_or(VoteRejection::CounterOverflow)?;

        let patch = match polarity {
            Polarity::Like => ThreadPatch {
                likes: Some(bumped),
                dislikes: None,
                voters,
            },
            Polarity::Dislike => ThreadPatch {
                likes: None,
                dislikes: Some(bumped),
                voters,
            },
        };

        Ok(Ballot {
            patch,
            record: VoteRecord {
                thread_id: thread.id,
                voter: self.voter.clone(),
                polarity,
            },
        })
    }

    /// Persists a vote flag. Flags are never cleared.
    pub fn commit(&self, record: &VoteRecord) -> anyhow::Result<()> {
        self.store.set(&record.key(), "true")
    }

    pub fn vote_state(&self, thread_id: ThreadId) -> VoteState {
        if self.has_flag(thread_id, Polarity::Like) {
            VoteState::Liked
        } else if self.has_flag(thread_id, Polarity::Dislike) {
            VoteState::Disliked
        } else {
            VoteState::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    impl LocalStore for MapStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn thread(id: ThreadId) -> Thread {
        Thread {
            id,
            content: "hello".into(),
            author: Some("Amy".into()),
            likes: 0,
            dislikes: 0,
            voters: vec![],
            created_at: None,
        }
    }

    fn ledger(voter: &str) -> VoteLedger<MapStore> {
        VoteLedger::new(VoterId::new(voter), MapStore::default())
    }

    #[test]
    fn test_like_increments_and_appends_voter() {
        let ledger = ledger("X");
        let ballot = ledger.cast_vote(&thread(1), Polarity::Like).unwrap();

        assert_eq!(ballot.patch.likes, Some(1));
        assert_eq!(ballot.patch.dislikes, None);
        assert_eq!(ballot.patch.voters, vec![VoterId::new("X")]);
        assert_eq!(ballot.record.key(), "liked_1_X");
    }

    #[test]
    fn test_cast_without_commit_has_no_effect() {
        let ledger = ledger("X");
        ledger.cast_vote(&thread(1), Polarity::Like).unwrap();

        assert!(ledger.can_vote(1, Polarity::Like));
        assert_eq!(ledger.vote_state(1), VoteState::None);
    }

    #[test]
    fn test_committed_like_blocks_both_polarities() {
        let ledger = ledger("X");
        let ballot = ledger.cast_vote(&thread(1), Polarity::Like).unwrap();
        ledger.commit(&ballot.record).unwrap();

        assert!(!ledger.can_vote(1, Polarity::Like));
        assert!(!ledger.can_vote(1, Polarity::Dislike));
        assert_eq!(ledger.check(1, Polarity::Like), Err(VoteRejection::AlreadyVoted));
        assert_eq!(ledger.check(1, Polarity::Dislike), Err(VoteRejection::OppositeVoteExists));
        assert_eq!(ledger.vote_state(1), VoteState::Liked);
    }

    #[test]
    fn test_dislike_then_like_is_rejected() {
        let ledger = ledger("X");
        let mut t = thread(7);
        let ballot = ledger.cast_vote(&t, Polarity::Dislike).unwrap();
        ledger.commit(&ballot.record).unwrap();
        ballot.patch.apply_to(&mut t);

        assert_eq!(t.dislikes, 1);
        assert_eq!(
            ledger.cast_vote(&t, Polarity::Like),
            Err(VoteRejection::OppositeVoteExists)
        );
        assert_eq!(ledger.vote_state(7), VoteState::Disliked);
    }

    #[test]
    fn test_votes_are_scoped_per_thread_and_voter() {
        let store = std::sync::Arc::new(MapStore::default());
        let x = VoteLedger::new(VoterId::new("X"), store.clone());
        let y = VoteLedger::new(VoterId::new("Y"), store);

        let ballot = x.cast_vote(&thread(1), Polarity::Like).unwrap();
        x.commit(&ballot.record).unwrap();

        assert!(x.can_vote(2, Polarity::Like));
        assert!(y.can_vote(1, Polarity::Like));
        assert!(y.can_vote(1, Polarity::Dislike));
    }

    #[test]
    fn test_existing_voter_is_not_duplicated() {
        let ledger = ledger("X");
        let mut t = thread(1);
        t.likes = 4;
        t.voters = vec![VoterId::new("X"), VoterId::new("Y")];

        let ballot = ledger.cast_vote(&t, Polarity::Like).unwrap();
        assert_eq!(ballot.patch.likes, Some(5));
        assert_eq!(ballot.patch.voters.len(), 2);
    }

    #[test]
    fn test_saturated_counter_is_rejected() {
        let ledger = ledger("X");
        let mut t = thread(1);
        t.likes = u64::MAX;

        assert_eq!(
            ledger.cast_vote(&t, Polarity::Like),
            Err(VoteRejection::CounterOverflow)
        );
        // The other counter is unaffected.
        assert_eq!(ledger.cast_vote(&t, Polarity::Dislike).unwrap().patch.dislikes, Some(1));
        assert_eq!(ledger.vote_state(1), VoteState::None);
    }

    #[test]
    fn test_voter_id_is_generated_once() {
        let store = MapStore::default();
        let first = VoterId::load_or_generate(&store).unwrap();
        let second = VoterId::load_or_generate(&store).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get(VOTER_ID_KEY).as_deref(), Some(first.as_str()));
    }
}
