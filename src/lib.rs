//! NBA season standings prediction from per-game statistics
//!
//! Trains an ensemble of decision-tree classifiers on historical seasons and
//! predicts the final standings of a held-out season, reporting the deviation
//! between predicted and actual rank per team.

pub mod data;
pub mod model;
pub mod predict;
pub mod schedule;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One team's row for a single season: identity, final standing, and the
/// per-game statistic vector aligned with the owning table's columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeasonRecord {
    pub team: String,
    /// Ground-truth finishing position, 1..=T within the season.
    pub actual_rank: u32,
    pub stats: Vec<f64>,
}

/// A team's predicted standing after ensemble averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledStanding {
    pub predicted_rank: u32,
    pub team: String,
    /// Mean predicted rank across ensemble repeats, rounded to 2 decimals.
    pub rank_score: f64,
}

/// Predicted vs. actual standing for one team.
///
/// `difference = actual_rank - predicted_rank`: positive means the team
/// finished worse than predicted, negative means it finished better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationRecord {
    pub team: String,
    pub actual_rank: u32,
    pub predicted_rank: u32,
    pub difference: i64,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("Schema mismatch: expected columns [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Season {season}: joined {found} teams, expected {expected}{}", missing_suffix(.missing))]
    LeagueSize {
        season: String,
        expected: usize,
        found: usize,
        missing: Vec<String>,
    },

    #[error("Ensemble repeat count must be at least 1, got {0}")]
    InvalidRepeats(usize),

    #[error("Failed to read {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Column not found in table: {0}")]
    MissingColumn(String),

    #[error("Invalid numeric value {value:?} in column {column}: {message}")]
    BadValue {
        column: String,
        value: String,
        message: String,
    },

    #[error("Training corpus is empty")]
    EmptyCorpus,

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn missing_suffix(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!(" (missing: {})", missing.join(", "))
    }
}

pub type Result<T> = std::result::Result<T, HoopsError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ensemble: EnsembleSettings,
    pub league: LeagueSettings,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleSettings {
    /// Number of independent fit/predict repeats averaged per run.
    pub repeats: usize,
    /// Base RNG seed; absent means seed from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSettings {
    /// Number of teams expected in every season table.
    pub size: usize,
    /// Feature columns dropped from the per-game stat table before training.
    pub drop_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding per-season standings and per-game stat CSVs.
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ensemble: EnsembleSettings {
                repeats: 100,
                seed: None,
            },
            league: LeagueSettings {
                size: 30,
                // Source rank duplicate, schedule-length counts, and raw
                // counting stats superseded by per-game rates.
                drop_columns: ["Rk", "G", "MP", "FG", "3P", "2P", "FT", "TRB"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            data: DataConfig {
                data_dir: "data".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HoopsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HoopsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HoopsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl fmt::Display for DeviationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: actual {}, predicted {}, difference {:+}",
            self.team, self.actual_rank, self.predicted_rank, self.difference
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_size_error_names_missing_teams() {
        let err = HoopsError::LeagueSize {
            season: "2020-21".to_string(),
            expected: 30,
            found: 28,
            missing: vec!["Utah Jazz".to_string(), "Phoenix Suns".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2020-21"));
        assert!(msg.contains("Utah Jazz"));
        assert!(msg.contains("Phoenix Suns"));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.ensemble.repeats, config.ensemble.repeats);
        assert_eq!(back.league.size, 30);
        assert_eq!(back.league.drop_columns, config.league.drop_columns);
    }
}
