//! Rank prediction and ensemble averaging
//!
//! One decision tree per repeat, predicted ranks accumulated elementwise
//! and averaged into per-team rank scores.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{corpus::check_schema, PredictionTarget, TrainingCorpus};
use crate::model::DecisionTree;
use crate::{HoopsError, Result};

/// Train a fresh classifier on the corpus and predict a rank for every
/// target row, in target row order.
pub fn predict_ranks<R: Rng>(
    corpus: &TrainingCorpus,
    target: &PredictionTarget,
    rng: &mut R,
) -> Result<Vec<u32>> {
    check_schema(&corpus.columns, &target.columns)?;
    let tree = DecisionTree::fit(&corpus.features, &corpus.labels, rng)?;
    Ok(target.features.iter().map(|row| tree.predict(row)).collect())
}

/// Ensemble averager: repeats the fit/predict cycle and averages the
/// predicted ranks into per-team scores.
#[derive(Debug, Clone)]
pub struct Ensemble {
    repeats: usize,
    /// Base seed for per-repeat RNGs; None seeds from entropy.
    seed: Option<u64>,
}

impl Ensemble {
    /// Rejects a zero repeat count up front, before any training happens.
    pub fn new(repeats: usize, seed: Option<u64>) -> Result<Self> {
        if repeats == 0 {
            return Err(HoopsError::InvalidRepeats(repeats));
        }
        Ok(Ensemble { repeats, seed })
    }

    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// Run K independent fit/predict repeats and average elementwise.
    ///
    /// Accumulation is repeat-major in a fixed order, so rounding is
    /// reproducible for a given sequence of per-repeat predictions. Scores
    /// align positionally with the target rows and are rounded to 2
    /// decimals.
    pub fn rank_scores(
        &self,
        corpus: &TrainingCorpus,
        target: &PredictionTarget,
    ) -> Result<Vec<f64>> {
        let mut sums = vec![0.0f64; target.len()];
        for repeat in 0..self.repeats {
            let mut rng = self.repeat_rng(repeat);
            let predictions = predict_ranks(corpus, target, &mut rng)?;
            for (sum, rank) in sums.iter_mut().zip(&predictions) {
                *sum += f64::from(*rank);
            }
            log::debug!("Ensemble repeat {}/{} done", repeat + 1, self.repeats);
        }

        Ok(sums
            .into_iter()
            .map(|sum| round2(sum / self.repeats as f64))
            .collect())
    }

    /// Each repeat gets its own RNG so repeats stay independent; a base
    /// seed pins the whole run for tests.
    fn repeat_rng(&self, repeat: usize) -> StdRng {
        match self.seed {
            Some(base) => StdRng::seed_from_u64(base.wrapping_add(repeat as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Round half away from zero to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeasonTable;
    use crate::TeamSeasonRecord;

    fn season(label: &str, teams: &[(&str, u32, f64)]) -> SeasonTable {
        SeasonTable {
            season: label.to_string(),
            columns: vec!["PTS".to_string()],
            records: teams
                .iter()
                .map(|(team, rank, pts)| TeamSeasonRecord {
                    team: team.to_string(),
                    actual_rank: *rank,
                    stats: vec![*pts],
                })
                .collect(),
        }
    }

    fn separable_fixture() -> (TrainingCorpus, PredictionTarget) {
        let seasons = vec![
            season("a", &[("P", 1, 120.0), ("Q", 2, 110.0), ("R", 3, 100.0)]),
            season("b", &[("P", 1, 121.0), ("Q", 2, 111.0), ("R", 3, 101.0)]),
        ];
        let held_out = season("c", &[("P", 1, 119.5), ("Q", 2, 110.5), ("R", 3, 99.5)]);
        (
            TrainingCorpus::build(&seasons).unwrap(),
            PredictionTarget::from_season(&held_out),
        )
    }

    #[test]
    fn test_zero_repeats_rejected_before_training() {
        assert!(matches!(
            Ensemble::new(0, None),
            Err(HoopsError::InvalidRepeats(0))
        ));
    }

    #[test]
    fn test_single_repeat_equals_raw_prediction() {
        let (corpus, target) = separable_fixture();
        let ensemble = Ensemble::new(1, Some(3)).unwrap();
        let scores = ensemble.rank_scores(&corpus, &target).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let raw = predict_ranks(&corpus, &target, &mut rng).unwrap();
        let expected: Vec<f64> = raw.iter().map(|r| round2(f64::from(*r))).collect();
        assert_eq!(scores, expected);
    }

    #[test]
    fn test_scores_are_rounded_means() {
        // Separable data: every repeat predicts the true ranks, so the mean
        // is exact regardless of K.
        let (corpus, target) = separable_fixture();
        let ensemble = Ensemble::new(10, Some(99)).unwrap();
        let scores = ensemble.rank_scores(&corpus, &target).unwrap();
        assert_eq!(scores, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let (corpus, target) = separable_fixture();
        let a = Ensemble::new(5, Some(11)).unwrap();
        let b = Ensemble::new(5, Some(11)).unwrap();
        assert_eq!(
            a.rank_scores(&corpus, &target).unwrap(),
            b.rank_scores(&corpus, &target).unwrap()
        );
    }

    #[test]
    fn test_schema_mismatch_fails_prediction() {
        let (corpus, _) = separable_fixture();
        let mut target = PredictionTarget::from_season(&season("c", &[("P", 1, 119.5)]));
        target.columns = vec!["TRB".to_string()];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            predict_ranks(&corpus, &target, &mut rng),
            Err(HoopsError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.875), 2.88);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0), 2.0);
    }
}
