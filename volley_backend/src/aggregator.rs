use std::collections::HashMap;

use volley_entities::{
    prelude::{Participant, ParticipantScore, Vote},
    Uuid,
};


/// Average used for participants nobody has rated yet. Sits in the middle
/// of the score range so it neither helps nor hurts a team.
pub const NEUTRAL_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReceivedScore {
    Rated { total: u32, votes: u32 },
    Unrated,
}

impl ReceivedScore {
    fn add(self, score: u8) -> Self {
        match self {
            ReceivedScore::Rated { total, votes } => ReceivedScore::Rated {
                total: total + score as u32,
                votes: votes + 1,
            },
            ReceivedScore::Unrated => ReceivedScore::Rated {
                total: score as u32,
                votes: 1,
            },
        }
    }

    pub fn average(&self) -> f64 {
        match self {
            ReceivedScore::Rated { total, votes } => *total as f64 / *votes as f64,
            ReceivedScore::Unrated => NEUTRAL_SCORE,
        }
    }

    pub fn vote_count(&self) -> u32 {
        match self {
            ReceivedScore::Rated { votes, .. } => *votes,
            ReceivedScore::Unrated => 0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Scores received by every roster member. The ledger holds at most one
    /// vote per (voter, target), so each vote here is a distinct voter.
    pub fn received_scores(&self, roster: &[Uuid], votes: &[Vote]) -> HashMap<Uuid, ReceivedScore> {
        let mut received: HashMap<Uuid, ReceivedScore> = roster
            .iter()
            .map(|id| (*id, ReceivedScore::Unrated))
            .collect();

        for vote in votes {
            if let Some(entry) = received.get_mut(&vote.target_id) {
                *entry = entry.add(vote.score.value());
            }
        }
        received
    }

    pub fn averages(&self, roster: &[Uuid], votes: &[Vote]) -> HashMap<Uuid, f64> {
        self.received_scores(roster, votes)
            .into_iter()
            .map(|(id, score)| (id, score.average()))
            .collect()
    }

    /// Same as `averages`, joined with participant data and kept in the
    /// order of `participants`.
    pub fn participant_scores(&self, participants: &[Participant], votes: &[Vote]) -> Vec<ParticipantScore> {
        let roster = participants.iter().map(|p| p.id).collect::<Vec<_>>();
        let received = self.received_scores(&roster, votes);
        participants
            .iter()
            .map(|p| {
                let average = received.get(&p.id).map(|s| s.average()).unwrap_or(NEUTRAL_SCORE);
                ParticipantScore::new(p, average)
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use volley_entities::prelude::{Gender, VoteScore};

    use super::*;

    fn vote(voter: u128, target: u128, score: i64) -> Vote {
        Vote {
            event_id: Uuid::from_u128(1000),
            voter_id: Uuid::from_u128(voter),
            target_id: Uuid::from_u128(target),
            score: VoteScore::new(score).unwrap(),
        }
    }

    #[test]
    fn test_averages_of_three_participants() {
        let roster = vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)];
        let votes = vec![
            vote(1, 2, 6), vote(1, 3, 8),
            vote(2, 1, 4), vote(2, 3, 10),
            vote(3, 1, 5), vote(3, 2, 7),
        ];
        let averages = ScoreAggregator.averages(&roster, &votes);

        assert_eq!(averages[&Uuid::from_u128(1)], 4.5);
        assert_eq!(averages[&Uuid::from_u128(2)], 6.5);
        assert_eq!(averages[&Uuid::from_u128(3)], 9.0);
    }

    #[test]
    fn test_unrated_participant_gets_neutral_score() {
        let roster = vec![Uuid::from_u128(1), Uuid::from_u128(2)];
        let received = ScoreAggregator.received_scores(&roster, &[vote(1, 2, 9)]);

        assert_eq!(received[&Uuid::from_u128(1)], ReceivedScore::Unrated);
        assert_eq!(received[&Uuid::from_u128(1)].average(), NEUTRAL_SCORE);
        assert_eq!(received[&Uuid::from_u128(1)].vote_count(), 0);
        assert_eq!(received[&Uuid::from_u128(2)].average(), 9.0);
    }

    #[test]
    fn test_votes_for_non_members_are_ignored() {
        let roster = vec![Uuid::from_u128(1)];
        let averages = ScoreAggregator.averages(&roster, &[vote(2, 3, 10)]);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[&Uuid::from_u128(1)], NEUTRAL_SCORE);
    }

    #[test]
    fn test_participant_scores_keep_roster_order() {
        let participants = vec![
            Participant::new(Uuid::from_u128(2), "bravo", Gender::F),
            Participant::new(Uuid::from_u128(1), "alpha", Gender::M),
        ];
        let scores = ScoreAggregator.participant_scores(&participants, &[vote(1, 2, 3)]);

        assert_eq!(scores[0].username, "bravo");
        assert_eq!(scores[0].average_score, 3.0);
        assert_eq!(scores[1].username, "alpha");
        assert_eq!(scores[1].average_score, NEUTRAL_SCORE);
    }
}
