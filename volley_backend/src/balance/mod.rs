//! Splitting a roster into two teams.
//!
//! Balancing runs in two stages: a greedy seed that hands out players from
//! strongest to weakest, followed by a bounded local search over pairwise
//! swaps. The search stops at a local optimum, so the result is never worse
//! than the seed but is not guaranteed to be the best possible split.

pub mod refinement;
pub mod seed;

use tracing::debug;
use volley_entities::prelude::{GenderCounts, ParticipantScore, TeamAssignment};

use crate::config::BalancingConfig;

use self::{refinement::refine, seed::greedy_seed};


/// Scores closer than this are treated as equal.
pub(crate) const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub(crate) struct TeamState {
    pub members: Vec<ParticipantScore>,
    pub genders: GenderCounts,
}

impl TeamState {
    pub fn push(&mut self, player: ParticipantScore) {
        self.genders.add(player.gender);
        self.members.push(player);
    }

    pub fn total(&self) -> f64 {
        self.members.iter().map(|m| m.average_score).sum()
    }
}

pub(crate) fn score_imbalance(team_a: &TeamState, team_b: &TeamState) -> f64 {
    (team_a.total() - team_b.total()).abs()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementReport {
    pub seed_imbalance: f64,
    pub final_imbalance: f64,
    pub passes: usize,
    pub swaps: usize,
}

#[derive(Debug, Clone)]
pub struct BalancingEngine {
    pub max_refinement_passes: usize,
}

impl Default for BalancingEngine {
    fn default() -> Self {
        BalancingEngine::new(&BalancingConfig::default())
    }
}

impl BalancingEngine {
    pub fn new(config: &BalancingConfig) -> Self {
        BalancingEngine {
            max_refinement_passes: config.max_refinement_passes,
        }
    }

    pub fn balance(&self, players: Vec<ParticipantScore>) -> TeamAssignment {
        self.balance_with_report(players).0
    }

    pub fn balance_with_report(&self, players: Vec<ParticipantScore>) -> (TeamAssignment, RefinementReport) {
        let (mut team_a, mut team_b) = greedy_seed(players);
        let seed_imbalance = score_imbalance(&team_a, &team_b);

        let outcome = refine(&mut team_a, &mut team_b, self.max_refinement_passes);
        let report = RefinementReport {
            seed_imbalance,
            final_imbalance: score_imbalance(&team_a, &team_b),
            passes: outcome.passes,
            swaps: outcome.swaps,
        };
        debug!(
            "Balanced {} players: imbalance {:.2} -> {:.2} after {} passes ({} swaps)",
            team_a.members.len() + team_b.members.len(),
            report.seed_imbalance,
            report.final_imbalance,
            report.passes,
            report.swaps
        );

        (TeamAssignment::new(team_a.members, team_b.members), report)
    }
}
