use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;


/// A peer rating, guaranteed to lie in `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VoteScore(u8);

impl VoteScore {
    pub fn new(score: i64) -> Result<Self, EngineError> {
        if score < MIN_SCORE as i64 || score > MAX_SCORE as i64 {
            return Err(EngineError::InvalidScore(score));
        }
        Ok(VoteScore(score as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for VoteScore {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        VoteScore::new(value)
    }
}

impl<'de> Deserialize<'de> for VoteScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: serde::Deserializer<'de> {
        let raw = i64::deserialize(deserializer)?;
        VoteScore::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub event_id: Uuid,
    pub voter_id: Uuid,
    pub target_id: Uuid,
    pub score: VoteScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingProgress {
    pub completed_voters: usize,
    pub required_voters: usize,
    pub can_show_results: bool,
}

impl VotingProgress {
    pub fn new(completed_voters: usize, required_voters: usize) -> Self {
        VotingProgress {
            completed_voters,
            required_voters,
            can_show_results: completed_voters >= required_voters,
        }
    }
}
