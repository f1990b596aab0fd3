use chrono::Weekday;
use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub quorum: QuorumPolicy,
    pub balancing: BalancingConfig,
    /// Events may only be created on this day of the week.
    pub voting_weekday: Weekday,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            quorum: QuorumPolicy::default(),
            balancing: BalancingConfig::default(),
            voting_weekday: Weekday::Thu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// A voter counts once they have rated anybody.
    AnyVote,
    /// A voter counts once they have rated every other participant.
    FullBallot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuorumPolicy {
    pub required_voters: usize,
    /// Lower the requirement to the roster size for small rosters.
    pub scale_to_roster: bool,
    pub completion: CompletionRule,
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        QuorumPolicy {
            required_voters: 12,
            scale_to_roster: false,
            completion: CompletionRule::AnyVote,
        }
    }
}

impl QuorumPolicy {
    pub fn required_for(&self, roster_size: usize) -> usize {
        let required = if self.scale_to_roster {
            self.required_voters.min(roster_size)
        } else {
            self.required_voters
        };
        required.max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingConfig {
    pub max_refinement_passes: usize,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        BalancingConfig {
            max_refinement_passes: 50,
        }
    }
}
