use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::participant::{Gender, GenderCounts, Participant};


/// A participant together with the mean of the scores they received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantScore {
    pub user_id: Uuid,
    pub username: String,
    pub gender: Gender,
    pub average_score: f64,
}

impl ParticipantScore {
    pub fn new(participant: &Participant, average_score: f64) -> Self {
        ParticipantScore {
            user_id: participant.id,
            username: participant.username.clone(),
            gender: participant.gender,
            average_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub total_score: f64,
    pub average_score: f64,
    pub gender_counts: GenderCounts,
}

impl TeamSummary {
    pub fn from_members(members: &[ParticipantScore]) -> Self {
        let total_score: f64 = members.iter().map(|m| m.average_score).sum();
        let average_score = if members.is_empty() {
            0.0
        } else {
            total_score / members.len() as f64
        };
        TeamSummary {
            total_score,
            average_score,
            gender_counts: members.iter().map(|m| &m.gender).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub team_a: TeamSummary,
    pub team_b: TeamSummary,
}

/// Two disjoint teams covering a roster exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team_a: Vec<ParticipantScore>,
    pub team_b: Vec<ParticipantScore>,
    pub summary: AssignmentSummary,
}

impl TeamAssignment {
    pub fn new(team_a: Vec<ParticipantScore>, team_b: Vec<ParticipantScore>) -> Self {
        let summary = AssignmentSummary {
            team_a: TeamSummary::from_members(&team_a),
            team_b: TeamSummary::from_members(&team_b),
        };
        TeamAssignment {
            team_a,
            team_b,
            summary,
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &ParticipantScore> {
        self.team_a.iter().chain(self.team_b.iter())
    }

    pub fn score_imbalance(&self) -> f64 {
        (self.summary.team_a.total_score - self.summary.team_b.total_score).abs()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn player(n: u128, gender: Gender, score: f64) -> ParticipantScore {
        ParticipantScore {
            user_id: Uuid::from_u128(n),
            username: format!("player{}", n),
            gender,
            average_score: score,
        }
    }

    #[test]
    fn test_summary_of_empty_team_is_zero() {
        let summary = TeamSummary::from_members(&[]);
        assert_eq!(summary.total_score, 0.0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.gender_counts.total(), 0);
    }

    #[test]
    fn test_assignment_summary() {
        let assignment = TeamAssignment::new(
            vec![player(1, Gender::M, 8.0), player(2, Gender::F, 4.0)],
            vec![player(3, Gender::F, 5.0)],
        );

        assert_eq!(assignment.summary.team_a.total_score, 12.0);
        assert_eq!(assignment.summary.team_a.average_score, 6.0);
        assert_eq!(assignment.summary.team_a.gender_counts, GenderCounts { m: 1, f: 1 });
        assert_eq!(assignment.summary.team_b.gender_counts, GenderCounts { m: 0, f: 1 });
        assert_eq!(assignment.score_imbalance(), 7.0);
        assert_eq!(assignment.members().count(), 3);
    }
}
