use volley_entities::prelude::GenderCounts;

use super::{score_imbalance, TeamState, SCORE_EPSILON};


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RefinementOutcome {
    pub passes: usize,
    pub swaps: usize,
}

#[derive(Debug, Clone, Copy)]
struct Swap {
    idx_a: usize,
    idx_b: usize,
    imbalance: f64,
}

fn gender_skew(a: &GenderCounts, b: &GenderCounts) -> (usize, usize) {
    (a.m.abs_diff(b.m), a.f.abs_diff(b.f))
}

/// Best swap in a single pass: the one leaving the smallest score
/// imbalance, among swaps that strictly improve it and leave neither
/// gender more skewed. Earlier pairs win ties.
fn find_best_swap(team_a: &TeamState, team_b: &TeamState) -> Option<Swap> {
    let total_a = team_a.total();
    let total_b = team_b.total();
    let current = (total_a - total_b).abs();
    let (skew_m, skew_f) = gender_skew(&team_a.genders, &team_b.genders);

    let mut best: Option<Swap> = None;
    for (idx_a, player_a) in team_a.members.iter().enumerate() {
        for (idx_b, player_b) in team_b.members.iter().enumerate() {
            let delta = player_b.average_score - player_a.average_score;
            let imbalance = ((total_a + delta) - (total_b - delta)).abs();
            if imbalance + SCORE_EPSILON >= current {
                continue;
            }

            if player_a.gender != player_b.gender {
                let mut genders_a = team_a.genders;
                let mut genders_b = team_b.genders;
                genders_a.remove(player_a.gender);
                genders_a.add(player_b.gender);
                genders_b.remove(player_b.gender);
                genders_b.add(player_a.gender);
                let (new_skew_m, new_skew_f) = gender_skew(&genders_a, &genders_b);
                if new_skew_m > skew_m || new_skew_f > skew_f {
                    continue;
                }
            }

            match best {
                Some(swap) if swap.imbalance <= imbalance + SCORE_EPSILON => {}
                _ => best = Some(Swap { idx_a, idx_b, imbalance }),
            }
        }
    }
    best
}

fn apply_swap(team_a: &mut TeamState, team_b: &mut TeamState, swap: Swap) {
    let player_a = &mut team_a.members[swap.idx_a];
    let player_b = &mut team_b.members[swap.idx_b];
    team_a.genders.remove(player_a.gender);
    team_a.genders.add(player_b.gender);
    team_b.genders.remove(player_b.gender);
    team_b.genders.add(player_a.gender);
    std::mem::swap(player_a, player_b);
}

/// Applies the best improving swap per pass until none is left or
/// `max_passes` passes have run.
pub(crate) fn refine(team_a: &mut TeamState, team_b: &mut TeamState, max_passes: usize) -> RefinementOutcome {
    let mut outcome = RefinementOutcome::default();

    while outcome.passes < max_passes {
        outcome.passes += 1;
        match find_best_swap(team_a, team_b) {
            Some(swap) => {
                tracing::trace!(
                    "Refinement pass {}: swapping {} and {}, imbalance {:.3} -> {:.3}",
                    outcome.passes,
                    team_a.members[swap.idx_a].username,
                    team_b.members[swap.idx_b].username,
                    score_imbalance(team_a, team_b),
                    swap.imbalance
                );
                apply_swap(team_a, team_b, swap);
                outcome.swaps += 1;
            }
            None => break,
        }
    }

    outcome
}
