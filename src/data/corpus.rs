//! Training corpus construction
//!
//! Concatenates cleaned season tables into the classifier's training input,
//! stripping team identity so it can never leak into the features.

use crate::data::SeasonTable;
use crate::{HoopsError, Result};

/// Supervised training input: feature rows plus rank labels, no identity.
#[derive(Debug, Clone)]
pub struct TrainingCorpus {
    /// Feature column names shared by every row.
    pub columns: Vec<String>,
    pub features: Vec<Vec<f64>>,
    /// Finishing position labels aligned with `features`.
    pub labels: Vec<u32>,
}

impl TrainingCorpus {
    /// Concatenate historical season tables, season order then per-season
    /// row order. Fails if any table's column schema differs from the first.
    pub fn build(seasons: &[SeasonTable]) -> Result<Self> {
        let first = seasons.first().ok_or(HoopsError::EmptyCorpus)?;
        let columns = first.columns.clone();

        let mut features = Vec::new();
        let mut labels = Vec::new();
        for season in seasons {
            check_schema(&columns, &season.columns)?;
            for record in &season.records {
                features.push(record.stats.clone());
                labels.push(record.actual_rank);
            }
        }

        log::info!(
            "Built training corpus: {} rows x {} features from {} seasons",
            features.len(),
            columns.len(),
            seasons.len()
        );

        Ok(TrainingCorpus {
            columns,
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// The held-out season under evaluation. Feature vectors exclude identity
/// and rank; actual ranks are kept aside for deviation reporting.
#[derive(Debug, Clone)]
pub struct PredictionTarget {
    pub columns: Vec<String>,
    pub teams: Vec<String>,
    pub features: Vec<Vec<f64>>,
    /// Ground-truth finishing positions, aligned with `teams`.
    pub actual_ranks: Vec<u32>,
}

impl PredictionTarget {
    pub fn from_season(season: &SeasonTable) -> Self {
        PredictionTarget {
            columns: season.columns.clone(),
            teams: season.records.iter().map(|r| r.team.clone()).collect(),
            features: season.records.iter().map(|r| r.stats.clone()).collect(),
            actual_ranks: season.records.iter().map(|r| r.actual_rank).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Column sets must match in content and order; report both on mismatch.
pub(crate) fn check_schema(expected: &[String], found: &[String]) -> Result<()> {
    if expected != found {
        return Err(HoopsError::SchemaMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamSeasonRecord;

    fn season(label: &str, columns: &[&str], teams: &[(&str, u32, &[f64])]) -> SeasonTable {
        SeasonTable {
            season: label.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            records: teams
                .iter()
                .map(|(team, rank, stats)| TeamSeasonRecord {
                    team: team.to_string(),
                    actual_rank: *rank,
                    stats: stats.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_concatenation_keeps_season_then_row_order() {
        let a = season(
            "2019-20",
            &["PTS", "AST"],
            &[("Bucks", 1, &[118.7, 25.9]), ("Raptors", 2, &[112.8, 25.4])],
        );
        let b = season(
            "2020-21",
            &["PTS", "AST"],
            &[("Jazz", 1, &[116.4, 23.7])],
        );
        let corpus = TrainingCorpus::build(&[a, b]).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.labels, vec![1, 2, 1]);
        assert_eq!(corpus.features[2], vec![116.4, 23.7]);
    }

    #[test]
    fn test_corpus_carries_no_identity() {
        let a = season("2020-21", &["PTS"], &[("Jazz", 1, &[116.4])]);
        let corpus = TrainingCorpus::build(&[a]).unwrap();
        assert!(!corpus.columns.iter().any(|c| c == "Team"));
        assert_eq!(corpus.features[0].len(), corpus.columns.len());
    }

    #[test]
    fn test_schema_mismatch_names_columns() {
        let a = season("2019-20", &["PTS", "AST"], &[("Bucks", 1, &[118.7, 25.9])]);
        let b = season("2020-21", &["PTS", "TRB"], &[("Jazz", 1, &[116.4, 48.3])]);
        let err = TrainingCorpus::build(&[a, b]).unwrap_err();
        match err {
            HoopsError::SchemaMismatch { expected, found } => {
                assert_eq!(expected, vec!["PTS", "AST"]);
                assert_eq!(found, vec!["PTS", "TRB"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_column_order_matters() {
        let a = season("2019-20", &["PTS", "AST"], &[("Bucks", 1, &[118.7, 25.9])]);
        let b = season("2020-21", &["AST", "PTS"], &[("Jazz", 1, &[23.7, 116.4])]);
        assert!(TrainingCorpus::build(&[a, b]).is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            TrainingCorpus::build(&[]),
            Err(HoopsError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_target_holds_ranks_out_of_features() {
        let s = season("2020-21", &["PTS"], &[("Jazz", 1, &[116.4])]);
        let target = PredictionTarget::from_season(&s);
        assert_eq!(target.features[0], vec![116.4]);
        assert_eq!(target.actual_ranks, vec![1]);
        assert_eq!(target.teams, vec!["Jazz"]);
    }
}
