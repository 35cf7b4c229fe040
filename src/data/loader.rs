//! Season table loading
//!
//! Joins a standings table with a per-game stat table into one cleaned
//! per-team row set for a single season.

use std::collections::HashMap;

use crate::data::RawTable;
use crate::{HoopsError, Result, TeamSeasonRecord};

/// Column holding the team identity in both source tables.
const TEAM_COLUMN: &str = "Team";
/// Column holding the finishing position in the standings table.
const RANK_COLUMN: &str = "Rk";
/// Non-team summary row injected by the per-game stat source.
const LEAGUE_AVERAGE: &str = "league average";

/// One season's cleaned, joined per-team rows.
#[derive(Debug, Clone)]
pub struct SeasonTable {
    pub season: String,
    /// Feature column names, identical set and order across seasons.
    pub columns: Vec<String>,
    /// One record per team, in standings order.
    pub records: Vec<TeamSeasonRecord>,
}

impl SeasonTable {
    /// League size for this season.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads season tables by joining standings and per-game stat sources.
#[derive(Debug, Clone)]
pub struct SeasonLoader {
    /// Teams expected per season; the join must account for all of them.
    league_size: usize,
    /// Stat columns excluded from the feature set.
    drop_columns: Vec<String>,
}

impl SeasonLoader {
    pub fn new(league_size: usize, drop_columns: Vec<String>) -> Self {
        SeasonLoader {
            league_size,
            drop_columns,
        }
    }

    /// Join one season's standings and per-game stat tables into a
    /// [`SeasonTable`].
    ///
    /// Team names in the stat table are stripped of trailing `*` playoff
    /// markers before joining; the league-average summary row is excluded by
    /// content, not position. Output rows follow standings order.
    pub fn load(
        &self,
        season: &str,
        standings: &RawTable,
        per_game: &RawTable,
    ) -> Result<SeasonTable> {
        let columns = self.feature_columns(per_game)?;

        // Stat lookup keyed by cleaned team name.
        let mut stats_by_team: HashMap<String, Vec<f64>> = HashMap::new();
        for row in 0..per_game.rows().len() {
            let raw_name = per_game.cell(row, TEAM_COLUMN)?;
            let name = clean_team_name(raw_name);
            if name.to_lowercase() == LEAGUE_AVERAGE {
                log::debug!("Season {}: excluding summary row {:?}", season, raw_name);
                continue;
            }
            let mut stats = Vec::with_capacity(columns.len());
            for column in &columns {
                stats.push(per_game.numeric_cell(row, column)?);
            }
            stats_by_team.insert(name, stats);
        }

        // Inner join, walking the standings in rank order.
        let mut records = Vec::new();
        let mut missing = Vec::new();
        for row in 0..standings.rows().len() {
            let team = clean_team_name(standings.cell(row, TEAM_COLUMN)?);
            let rank = standings.cell(row, RANK_COLUMN)?;
            let actual_rank = rank.parse::<u32>().map_err(|e| HoopsError::BadValue {
                column: RANK_COLUMN.to_string(),
                value: rank.to_string(),
                message: e.to_string(),
            })?;
            match stats_by_team.remove(&team) {
                Some(stats) => records.push(TeamSeasonRecord {
                    team,
                    actual_rank,
                    stats,
                }),
                None => missing.push(team),
            }
        }

        if records.len() != self.league_size {
            return Err(HoopsError::LeagueSize {
                season: season.to_string(),
                expected: self.league_size,
                found: records.len(),
                missing,
            });
        }

        log::info!(
            "Season {}: loaded {} teams with {} features",
            season,
            records.len(),
            columns.len()
        );

        Ok(SeasonTable {
            season: season.to_string(),
            columns,
            records,
        })
    }

    /// Feature columns: everything in the per-game table except the team
    /// identity and the configured drop list, in source order.
    fn feature_columns(&self, per_game: &RawTable) -> Result<Vec<String>> {
        // Surface a missing identity column as such rather than joining nothing.
        per_game.column_index(TEAM_COLUMN)?;
        Ok(per_game
            .columns()
            .iter()
            .filter(|c| *c != TEAM_COLUMN && !self.drop_columns.contains(c))
            .cloned()
            .collect())
    }
}

/// Strip cosmetic decoration from a team name (trailing playoff asterisks).
fn clean_team_name(name: &str) -> String {
    name.trim_end_matches('*').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings(rows: &str) -> RawTable {
        let csv = format!("Rk,Team\n{}", rows);
        RawTable::from_reader(csv.as_bytes(), "standings.csv").unwrap()
    }

    fn per_game(rows: &str) -> RawTable {
        let csv = format!("Rk,Team,G,PTS,AST\n{}", rows);
        RawTable::from_reader(csv.as_bytes(), "per_game.csv").unwrap()
    }

    fn loader(size: usize) -> SeasonLoader {
        SeasonLoader::new(size, vec!["Rk".to_string(), "G".to_string()])
    }

    #[test]
    fn test_join_strips_playoff_markers() {
        let ranks = standings("1,Utah Jazz\n2,Phoenix Suns\n");
        let stats = per_game("7,Utah Jazz*,72,116.4,23.7\n3,Phoenix Suns*,72,115.3,26.9\n");
        let table = loader(2).load("2020-21", &ranks, &stats).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].team, "Utah Jazz");
        assert_eq!(table.records[0].actual_rank, 1);
        assert_eq!(table.records[0].stats, vec![116.4, 23.7]);
    }

    #[test]
    fn test_drop_columns_removed_from_schema() {
        let ranks = standings("1,Utah Jazz\n");
        let stats = per_game("7,Utah Jazz,72,116.4,23.7\n");
        let table = loader(1).load("2020-21", &ranks, &stats).unwrap();
        assert_eq!(table.columns, ["PTS", "AST"]);
    }

    #[test]
    fn test_league_average_row_excluded_by_content() {
        let ranks = standings("1,Utah Jazz\n2,Phoenix Suns\n");
        // Summary row sits mid-table to prove exclusion is not positional.
        let stats = per_game(
            "7,Utah Jazz,72,116.4,23.7\n,League Average,72,112.1,24.8\n3,Phoenix Suns,72,115.3,26.9\n",
        );
        let table = loader(2).load("2020-21", &ranks, &stats).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.records.iter().all(|r| r.team != "League Average"));
    }

    #[test]
    fn test_rows_follow_standings_order() {
        let ranks = standings("1,Utah Jazz\n2,Phoenix Suns\n3,Denver Nuggets\n");
        let stats = per_game(
            "1,Denver Nuggets,72,110.0,25.0\n2,Phoenix Suns,72,115.3,26.9\n3,Utah Jazz,72,116.4,23.7\n",
        );
        let table = loader(3).load("2020-21", &ranks, &stats).unwrap();
        let teams: Vec<_> = table.records.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, ["Utah Jazz", "Phoenix Suns", "Denver Nuggets"]);
    }

    #[test]
    fn test_unjoined_team_fails_with_name() {
        let ranks = standings("1,Utah Jazz\n2,Phoenix Suns\n");
        let stats = per_game("7,Utah Jazz,72,116.4,23.7\n");
        let err = loader(2).load("2020-21", &ranks, &stats).unwrap_err();
        match err {
            HoopsError::LeagueSize {
                expected,
                found,
                missing,
                ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
                assert_eq!(missing, vec!["Phoenix Suns".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_team_column_is_reported() {
        let ranks = standings("1,Utah Jazz\n");
        let stats =
            RawTable::from_reader("Rk,Club,PTS\n1,Utah Jazz,116.4\n".as_bytes(), "pg.csv").unwrap();
        let err = loader(1).load("2020-21", &ranks, &stats).unwrap_err();
        assert!(matches!(err, HoopsError::MissingColumn(c) if c == "Team"));
    }
}
