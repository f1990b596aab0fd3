use std::sync::Arc;

use chrono::NaiveDate;
use itertools::Itertools;
use tracing::info;
use volley_entities::{
    prelude::{Event, Participant, ParticipantScore, TeamAssignment, VotingProgress},
    EngineError, Uuid,
};

use crate::{
    aggregator::ScoreAggregator,
    balance::BalancingEngine,
    cache::TeamResultCache,
    config::EngineConfig,
    directory::UserDirectory,
    ledger::{VoteLedger, VoteRecord},
    registry::{EventDatePolicy, EventRegistry, Roster},
};


/// Entry point tying events, votes and team computation together.
pub struct VotingService {
    config: EngineConfig,
    date_policy: EventDatePolicy,
    registry: EventRegistry,
    ledger: VoteLedger,
    cache: TeamResultCache,
    aggregator: ScoreAggregator,
    balancer: BalancingEngine,
    directory: Arc<dyn UserDirectory>,
}

impl VotingService {
    pub fn new(config: EngineConfig, directory: Arc<dyn UserDirectory>) -> Self {
        VotingService {
            date_policy: EventDatePolicy::new(config.voting_weekday),
            balancer: BalancingEngine::new(&config.balancing),
            config,
            registry: EventRegistry::new(),
            ledger: VoteLedger::new(),
            cache: TeamResultCache::new(),
            aggregator: ScoreAggregator,
            directory,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn date_policy(&self) -> &EventDatePolicy {
        &self.date_policy
    }

    pub async fn create_event(&self, date: NaiveDate, weekly_recurrence: bool) -> Result<Event, EngineError> {
        self.date_policy.check(date)?;
        Ok(self.registry.create(date, weekly_recurrence).await)
    }

    pub async fn list_events(&self) -> Vec<Event> {
        self.registry.list().await
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<Event, EngineError> {
        Ok(self.registry.get(event_id).await?.event.clone())
    }

    /// Looks up every roster member, in roster order.
    async fn resolve(&self, user_ids: &[Uuid]) -> Result<Vec<Participant>, EngineError> {
        let found = self.directory.get_many(user_ids).await?;
        let mut by_id = found.into_iter().map(|p| (p.id, p)).collect::<std::collections::HashMap<_, _>>();
        user_ids
            .iter()
            .map(|id| by_id.remove(id).ok_or(EngineError::UnknownUser(*id)))
            .collect()
    }

    /// Replaces the roster of an event. Only allowed before the first vote.
    pub async fn set_participants(&self, event_id: Uuid, user_ids: Vec<Uuid>) -> Result<Vec<Participant>, EngineError> {
        let entry = self.registry.get(event_id).await?;
        let new_roster = Roster::new(user_ids);
        let participants = self.resolve(new_roster.members()).await?;

        let mut roster = entry.roster.write().await;
        if self.ledger.has_votes(event_id).await {
            return Err(EngineError::RosterLocked(event_id));
        }
        *roster = new_roster;
        info!("Set {} participants for event {}", roster.len(), event_id);
        Ok(participants)
    }

    /// Roster members in roster order.
    pub async fn participants(&self, event_id: Uuid) -> Result<Vec<Participant>, EngineError> {
        let entry = self.registry.get(event_id).await?;
        let roster = entry.roster.read().await;
        self.resolve(roster.members()).await
    }

    pub async fn is_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, EngineError> {
        let entry = self.registry.get(event_id).await?;
        let is_member = entry.roster.read().await.contains(&user_id);
        Ok(is_member)
    }

    pub async fn submit_vote(&self, event_id: Uuid, voter_id: Uuid, target_id: Uuid, score: i64) -> Result<VoteRecord, EngineError> {
        let entry = self.registry.get(event_id).await?;
        let roster = entry.roster.read().await;
        if roster.is_empty() {
            return Err(EngineError::RosterNotSet(event_id));
        }
        self.ledger.submit(event_id, &roster, voter_id, target_id, score).await
    }

    pub async fn progress(&self, event_id: Uuid) -> Result<VotingProgress, EngineError> {
        let entry = self.registry.get(event_id).await?;
        let roster = entry.roster.read().await;
        if roster.is_empty() {
            return Err(EngineError::RosterNotSet(event_id));
        }
        Ok(self.ledger.progress(event_id, &roster, &self.config.quorum).await)
    }

    async fn ensure_quorum(&self, event_id: Uuid) -> Result<VotingProgress, EngineError> {
        let progress = self.progress(event_id).await?;
        if !progress.can_show_results {
            return Err(EngineError::QuorumNotMet {
                completed: progress.completed_voters,
                required: progress.required_voters,
            });
        }
        Ok(progress)
    }

    /// Current average received score of every roster member, in roster
    /// order. Computed fresh on every call.
    pub async fn averages(&self, event_id: Uuid) -> Result<Vec<ParticipantScore>, EngineError> {
        let entry = self.registry.get(event_id).await?;
        let roster = entry.roster.read().await;
        if roster.is_empty() {
            return Err(EngineError::RosterNotSet(event_id));
        }
        let participants = self.resolve(roster.members()).await?;
        let votes = self.ledger.snapshot(event_id).await;
        Ok(self.aggregator.participant_scores(&participants, &votes))
    }

    /// Averages ordered by username, available once the quorum is met.
    pub async fn scores(&self, event_id: Uuid) -> Result<Vec<ParticipantScore>, EngineError> {
        self.ensure_quorum(event_id).await?;
        Ok(self
            .averages(event_id)
            .await?
            .into_iter()
            .sorted_by(|a, b| a.username.cmp(&b.username))
            .collect())
    }

    /// Team split for an event. Computed on the first call after the quorum
    /// is met and served from the cache afterwards.
    pub async fn teams(&self, event_id: Uuid) -> Result<Arc<TeamAssignment>, EngineError> {
        self.ensure_quorum(event_id).await?;
        self.cache
            .get_or_try_compute(event_id, || async {
                let players = self.averages(event_id).await?;
                let (assignment, report) = self.balancer.balance_with_report(players);
                info!(
                    "Computed teams for event {} with score imbalance {:.2} (seed {:.2})",
                    event_id, report.final_imbalance, report.seed_imbalance
                );
                Ok(assignment)
            })
            .await
    }

    pub async fn invalidate_teams(&self, event_id: Uuid) -> Result<bool, EngineError> {
        self.registry.get(event_id).await?;
        Ok(self.cache.invalidate(event_id).await)
    }
}
