//! Standings prediction pipeline
//!
//! Ensemble-averaged rank prediction, standings assembly, and deviation
//! reporting for a held-out season.

pub mod ensemble;
pub mod standings;

pub use ensemble::{predict_ranks, Ensemble};
pub use standings::{assemble_standings, deviation_report};

use crate::data::{PredictionTarget, TrainingCorpus};
use crate::{AssembledStanding, DeviationRecord, Result};

/// Full pipeline for one held-out season: ensemble scores, assembled
/// standings, and the per-team deviation payload for rendering.
pub fn predict_season(
    corpus: &TrainingCorpus,
    target: &PredictionTarget,
    ensemble: &Ensemble,
) -> Result<(Vec<AssembledStanding>, Vec<DeviationRecord>)> {
    let scores = ensemble.rank_scores(corpus, target)?;
    let standings = assemble_standings(target, &scores);
    let report = deviation_report(&standings, target)?;
    Ok((standings, report))
}
