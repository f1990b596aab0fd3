use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use itertools::Itertools;
use tokio::sync::{Mutex, RwLock};
use volley_entities::{
    prelude::{Vote, VoteScore, VotingProgress},
    EngineError, Uuid,
};

use crate::{
    config::{CompletionRule, QuorumPolicy},
    registry::Roster,
};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VoteKey {
    voter_id: Uuid,
    target_id: Uuid,
}

/// The currently winning score for one (voter, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRecord {
    pub score: VoteScore,
    /// Increases with every write to the event, so later writes win.
    pub revision: u64,
}

type VoteSlot = Arc<Mutex<Option<VoteRecord>>>;

#[derive(Default)]
struct EventVotes {
    slots: RwLock<HashMap<VoteKey, VoteSlot>>,
    revision: AtomicU64,
}

impl EventVotes {
    async fn slot(&self, key: VoteKey) -> VoteSlot {
        if let Some(slot) = self.slots.read().await.get(&key) {
            return slot.clone();
        }
        self.slots.write().await.entry(key).or_default().clone()
    }

    async fn records(&self) -> Vec<(VoteKey, VoteRecord)> {
        let slots = self.slots.read().await;
        let mut out = Vec::with_capacity(slots.len());
        for (key, slot) in slots.iter() {
            if let Some(record) = *slot.lock().await {
                out.push((*key, record));
            }
        }
        out
    }
}

/// Store of peer votes, keyed by event and (voter, target).
///
/// Writes to the same (voter, target) pair are serialised on that pair's
/// slot, writes to other pairs or other events do not wait on each other
/// apart from the short map insertion when a pair is seen for the first
/// time.
#[derive(Default)]
pub struct VoteLedger {
    events: RwLock<HashMap<Uuid, Arc<EventVotes>>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    async fn event_votes(&self, event_id: Uuid) -> Arc<EventVotes> {
        if let Some(votes) = self.events.read().await.get(&event_id) {
            return votes.clone();
        }
        self.events.write().await.entry(event_id).or_default().clone()
    }

    async fn existing_event_votes(&self, event_id: Uuid) -> Option<Arc<EventVotes>> {
        self.events.read().await.get(&event_id).cloned()
    }

    /// Records or replaces the score `voter_id` gives `target_id`.
    pub async fn submit(
        &self,
        event_id: Uuid,
        roster: &Roster,
        voter_id: Uuid,
        target_id: Uuid,
        score: i64,
    ) -> Result<VoteRecord, EngineError> {
        let score = VoteScore::new(score)?;
        if voter_id == target_id {
            return Err(EngineError::SelfVote);
        }
        for user_id in [voter_id, target_id] {
            if !roster.contains(&user_id) {
                return Err(EngineError::UnknownParticipant(user_id));
            }
        }

        let votes = self.event_votes(event_id).await;
        let slot = votes.slot(VoteKey { voter_id, target_id }).await;
        let mut current = slot.lock().await;
        let record = VoteRecord {
            score,
            revision: votes.revision.fetch_add(1, Ordering::SeqCst) + 1,
        };
        *current = Some(record);
        Ok(record)
    }

    pub async fn get(&self, event_id: Uuid, voter_id: Uuid, target_id: Uuid) -> Option<VoteRecord> {
        let votes = self.existing_event_votes(event_id).await?;
        let slot = votes.slots.read().await.get(&VoteKey { voter_id, target_id }).cloned()?;
        let record = *slot.lock().await;
        record
    }

    pub async fn has_votes(&self, event_id: Uuid) -> bool {
        match self.existing_event_votes(event_id).await {
            Some(votes) => !votes.records().await.is_empty(),
            None => false,
        }
    }

    /// All votes of an event, ordered by the revision that wrote them.
    pub async fn snapshot(&self, event_id: Uuid) -> Vec<Vote> {
        let Some(votes) = self.existing_event_votes(event_id).await else {
            return vec![];
        };
        votes
            .records()
            .await
            .into_iter()
            .sorted_by_key(|(_, record)| record.revision)
            .map(|(key, record)| Vote {
                event_id,
                voter_id: key.voter_id,
                target_id: key.target_id,
                score: record.score,
            })
            .collect()
    }

    pub async fn progress(&self, event_id: Uuid, roster: &Roster, policy: &QuorumPolicy) -> VotingProgress {
        let votes = self.snapshot(event_id).await;
        let completed_voters = count_completed_voters(&votes, roster, policy.completion);
        VotingProgress::new(completed_voters, policy.required_for(roster.len()))
    }
}

fn count_completed_voters(votes: &[Vote], roster: &Roster, rule: CompletionRule) -> usize {
    let mut targets_by_voter: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for vote in votes.iter().filter(|v| roster.contains(&v.voter_id) && roster.contains(&v.target_id)) {
        targets_by_voter.entry(vote.voter_id).or_default().insert(vote.target_id);
    }

    match rule {
        CompletionRule::AnyVote => targets_by_voter.len(),
        CompletionRule::FullBallot => {
            let ballot_size = roster.len().saturating_sub(1);
            targets_by_voter.values().filter(|targets| targets.len() >= ballot_size).count()
        }
    }
}


#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn roster(n: u128) -> Roster {
        Roster::new((1..=n).map(Uuid::from_u128).collect())
    }

    const EVENT: Uuid = Uuid::from_u128(1000);

    #[tokio::test]
    async fn test_resubmission_overwrites() {
        let ledger = VoteLedger::new();
        let roster = roster(3);
        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(2), 3).await.unwrap();
        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(2), 8).await.unwrap();

        let votes = ledger.snapshot(EVENT).await;
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].score.value(), 8);
    }

    #[tokio::test]
    async fn test_rejected_votes_are_not_recorded() {
        let ledger = VoteLedger::new();
        let roster = roster(3);
        let one = Uuid::from_u128(1);
        let two = Uuid::from_u128(2);

        assert_matches!(ledger.submit(EVENT, &roster, one, two, 0).await, Err(EngineError::InvalidScore(0)));
        assert_matches!(ledger.submit(EVENT, &roster, one, two, 11).await, Err(EngineError::InvalidScore(11)));
        assert_matches!(ledger.submit(EVENT, &roster, one, one, 5).await, Err(EngineError::SelfVote));
        assert_matches!(
            ledger.submit(EVENT, &roster, one, Uuid::from_u128(9), 5).await,
            Err(EngineError::UnknownParticipant(id)) if id == Uuid::from_u128(9)
        );
        assert_matches!(
            ledger.submit(EVENT, &roster, Uuid::from_u128(9), one, 5).await,
            Err(EngineError::UnknownParticipant(_))
        );

        assert!(!ledger.has_votes(EVENT).await);
        assert!(ledger.snapshot(EVENT).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_score_is_checked_before_self_vote() {
        let ledger = VoteLedger::new();
        let one = Uuid::from_u128(1);
        assert_matches!(ledger.submit(EVENT, &roster(2), one, one, 42).await, Err(EngineError::InvalidScore(42)));
    }

    #[tokio::test]
    async fn test_progress_counts_distinct_voters() {
        let ledger = VoteLedger::new();
        let roster = roster(4);
        let policy = QuorumPolicy { required_voters: 2, ..Default::default() };

        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(2), 5).await.unwrap();
        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(3), 5).await.unwrap();
        let progress = ledger.progress(EVENT, &roster, &policy).await;
        assert_eq!(progress.completed_voters, 1);
        assert!(!progress.can_show_results);

        ledger.submit(EVENT, &roster, Uuid::from_u128(2), Uuid::from_u128(1), 5).await.unwrap();
        let progress = ledger.progress(EVENT, &roster, &policy).await;
        assert_eq!(progress.completed_voters, 2);
        assert_eq!(progress.required_voters, 2);
        assert!(progress.can_show_results);
    }

    #[tokio::test]
    async fn test_full_ballot_requires_every_target() {
        let ledger = VoteLedger::new();
        let roster = roster(3);
        let policy = QuorumPolicy { completion: CompletionRule::FullBallot, ..Default::default() };

        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(2), 5).await.unwrap();
        assert_eq!(ledger.progress(EVENT, &roster, &policy).await.completed_voters, 0);

        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(3), 5).await.unwrap();
        assert_eq!(ledger.progress(EVENT, &roster, &policy).await.completed_voters, 1);
    }

    #[tokio::test]
    async fn test_events_are_independent() {
        let ledger = VoteLedger::new();
        let roster = roster(2);
        let other_event = Uuid::from_u128(2000);
        ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(2), 4).await.unwrap();

        assert!(ledger.snapshot(other_event).await.is_empty());
        assert_eq!(ledger.get(EVENT, Uuid::from_u128(1), Uuid::from_u128(2)).await.unwrap().score.value(), 4);
        assert_eq!(ledger.get(other_event, Uuid::from_u128(1), Uuid::from_u128(2)).await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_same_pair_keep_one_value() {
        let ledger = Arc::new(VoteLedger::new());
        let roster = Arc::new(roster(2));

        let handles = (1..=10).map(|score| {
            let ledger = ledger.clone();
            let roster = roster.clone();
            tokio::spawn(async move {
                ledger.submit(EVENT, &roster, Uuid::from_u128(1), Uuid::from_u128(2), score).await.unwrap()
            })
        }).collect_vec();

        let mut records = vec![];
        for handle in handles {
            records.push(handle.await.unwrap());
        }

        let last_write = records.iter().max_by_key(|r| r.revision).unwrap();
        let votes = ledger.snapshot(EVENT).await;
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].score, last_write.score);
        assert_eq!(records.iter().map(|r| r.revision).unique().count(), 10);
    }
}
