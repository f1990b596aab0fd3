use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use volley_entities::prelude::{Gender, GenderCounts, ParticipantScore};

use super::{TeamState, SCORE_EPSILON};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    A,
    B,
}

impl Side {
    fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Per-gender seat counts for both teams. Team A receives the extra seat
/// of an odd roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Quotas {
    pub team_a: GenderCounts,
    pub team_b: GenderCounts,
}

impl Quotas {
    fn for_side(&self, side: Side) -> &GenderCounts {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }
}

pub(crate) fn gender_quotas(totals: GenderCounts) -> Quotas {
    let size_a = (totals.total() + 1) / 2;

    let quotas_for = |m_a: usize| {
        let f_a = size_a - m_a;
        Quotas {
            team_a: GenderCounts { m: m_a, f: f_a },
            team_b: GenderCounts { m: totals.m - m_a, f: totals.f - f_a },
        }
    };
    let skew = |q: &Quotas| q.team_a.m.abs_diff(q.team_b.m) + q.team_a.f.abs_diff(q.team_b.f);

    // Rounding the male seats down or up always leaves one feasible choice
    [totals.m / 2, (totals.m + 1) / 2]
        .into_iter()
        .filter(|m_a| *m_a <= size_a && size_a - *m_a <= totals.f)
        .map(|m_a| quotas_for(m_a))
        .min_by_key(skew)
        .unwrap_or_else(|| quotas_for(totals.m.min(size_a)))
}

/// Sorts players by score, strongest first. Equal scores keep their input
/// order.
pub(crate) fn sort_by_score(mut players: Vec<ParticipantScore>) -> Vec<ParticipantScore> {
    players.sort_by_key(|p| Reverse(OrderedFloat(p.average_score)));
    players
}

/// Hands out players strongest first, each to the team with the lower
/// running total. Ties go to the team with fewer players of the same
/// gender. A team whose quota for that gender is used up is skipped.
pub(crate) fn greedy_seed(players: Vec<ParticipantScore>) -> (TeamState, TeamState) {
    let totals = players.iter().map(|p| &p.gender).collect::<GenderCounts>();
    let quotas = gender_quotas(totals);

    let mut team_a = TeamState::default();
    let mut team_b = TeamState::default();
    let (mut total_a, mut total_b) = (0.0, 0.0);

    for player in sort_by_score(players) {
        let mut side = preferred_side(total_a, total_b, &team_a, &team_b, player.gender);
        let team = match side {
            Side::A => &team_a,
            Side::B => &team_b,
        };
        if team.genders.get(player.gender) >= quotas.for_side(side).get(player.gender) {
            side = side.other();
        }

        match side {
            Side::A => {
                total_a += player.average_score;
                team_a.push(player);
            }
            Side::B => {
                total_b += player.average_score;
                team_b.push(player);
            }
        }
    }

    (team_a, team_b)
}

fn preferred_side(total_a: f64, total_b: f64, team_a: &TeamState, team_b: &TeamState, gender: Gender) -> Side {
    if total_a + SCORE_EPSILON < total_b {
        Side::A
    } else if total_b + SCORE_EPSILON < total_a {
        Side::B
    } else if team_a.genders.get(gender) <= team_b.genders.get(gender) {
        Side::A
    } else {
        Side::B
    }
}
