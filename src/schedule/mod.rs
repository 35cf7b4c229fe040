//! Schedule-difficulty analysis
//!
//! Secondary aggregation: how teams perform in back-to-back games (two
//! games on consecutive calendar days) versus the rest of their schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One game from a team's log, in chronological order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameResult {
    pub date: NaiveDate,
    pub won: bool,
}

/// Back-to-back performance summary for one team's season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScheduleStats {
    pub team: String,
    pub season: String,
    pub total_win_pct: f64,
    /// None when the schedule had no back-to-back games.
    pub back_to_back_win_pct: Option<f64>,
    pub non_back_to_back_win_pct: Option<f64>,
    pub back_to_backs: usize,
}

/// League-wide averages over a set of team summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAverages {
    pub back_to_back_win_pct: Option<f64>,
    pub non_back_to_back_win_pct: Option<f64>,
    pub back_to_backs: f64,
}

/// Compute back-to-back splits from a chronological game log.
///
/// A game is a back-to-back when it falls exactly one calendar day after
/// the previous game in the log. The first game is never a back-to-back.
pub fn back_to_back_stats(team: &str, season: &str, games: &[GameResult]) -> TeamScheduleStats {
    let mut b2b_games = 0usize;
    let mut b2b_wins = 0usize;
    let mut rest_games = 0usize;
    let mut rest_wins = 0usize;

    let mut previous: Option<NaiveDate> = None;
    for game in games {
        let is_b2b = previous
            .map(|prev| (game.date - prev).num_days() == 1)
            .unwrap_or(false);
        if is_b2b {
            b2b_games += 1;
            if game.won {
                b2b_wins += 1;
            }
        } else {
            rest_games += 1;
            if game.won {
                rest_wins += 1;
            }
        }
        previous = Some(game.date);
    }

    let wins = b2b_wins + rest_wins;
    TeamScheduleStats {
        team: team.to_string(),
        season: season.to_string(),
        total_win_pct: ratio(wins, games.len()).unwrap_or(0.0),
        back_to_back_win_pct: ratio(b2b_wins, b2b_games),
        non_back_to_back_win_pct: ratio(rest_wins, rest_games),
        back_to_backs: b2b_games,
    }
}

/// Concatenate per-season summaries into one multi-season series.
pub fn merge_seasons(seasons: Vec<Vec<TeamScheduleStats>>) -> Vec<TeamScheduleStats> {
    seasons.into_iter().flatten().collect()
}

/// Average the splits over a set of team summaries. Teams without
/// back-to-back games are excluded from the back-to-back average rather
/// than poisoning it.
pub fn averages(stats: &[TeamScheduleStats]) -> ScheduleAverages {
    let b2b: Vec<f64> = stats.iter().filter_map(|s| s.back_to_back_win_pct).collect();
    let rest: Vec<f64> = stats
        .iter()
        .filter_map(|s| s.non_back_to_back_win_pct)
        .collect();
    let counts: Vec<f64> = stats.iter().map(|s| s.back_to_backs as f64).collect();

    ScheduleAverages {
        back_to_back_win_pct: mean(&b2b),
        non_back_to_back_win_pct: mean(&rest),
        back_to_backs: mean(&counts).unwrap_or(0.0),
    }
}

/// Per-season back-to-back win-rate averages, in first-seen season order.
pub fn averages_by_season(stats: &[TeamScheduleStats]) -> Vec<(String, ScheduleAverages)> {
    let mut seasons: Vec<String> = Vec::new();
    for s in stats {
        if !seasons.contains(&s.season) {
            seasons.push(s.season.clone());
        }
    }
    seasons
        .into_iter()
        .map(|season| {
            let subset: Vec<TeamScheduleStats> = stats
                .iter()
                .filter(|s| s.season == season)
                .cloned()
                .collect();
            let avg = averages(&subset);
            (season, avg)
        })
        .collect()
}

fn ratio(hits: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(hits as f64 / total as f64)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
