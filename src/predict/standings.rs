//! Standings assembly and deviation reporting
//!
//! Converts averaged rank scores into a total ordering and compares it
//! against the season's actual finishing positions.

use crate::data::PredictionTarget;
use crate::{AssembledStanding, DeviationRecord, HoopsError, Result};

/// Sort teams by rank score ascending and assign consecutive ranks 1..=T.
///
/// The sort is stable, so exact score ties keep the target row order. The
/// output is in predicted-rank order.
pub fn assemble_standings(target: &PredictionTarget, scores: &[f64]) -> Vec<AssembledStanding> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    order
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| AssembledStanding {
            predicted_rank: pos as u32 + 1,
            team: target.teams[idx].clone(),
            rank_score: scores[idx],
        })
        .collect()
}

/// Join assembled standings with actual ranks by team and compute the
/// per-team deviation, `actual_rank - predicted_rank`.
///
/// Positive difference: the team finished worse than predicted. The sign
/// convention is relied on by the rendering side and must not change.
pub fn deviation_report(
    standings: &[AssembledStanding],
    target: &PredictionTarget,
) -> Result<Vec<DeviationRecord>> {
    standings
        .iter()
        .map(|standing| {
            let actual_rank = target
                .teams
                .iter()
                .position(|t| *t == standing.team)
                .map(|i| target.actual_ranks[i])
                .ok_or_else(|| HoopsError::UnknownTeam(standing.team.clone()))?;
            Ok(DeviationRecord {
                team: standing.team.clone(),
                actual_rank,
                predicted_rank: standing.predicted_rank,
                difference: i64::from(actual_rank) - i64::from(standing.predicted_rank),
            })
        })
        .collect()
}
