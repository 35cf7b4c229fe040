//! NBA standings prediction CLI
//!
//! Predicts end-of-season standings from historical per-game statistics
//! using an ensemble of decision-tree classifiers.

use clap::{Parser, Subcommand};
use hoops::{Config, Result};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "NBA season standings prediction from per-game statistics", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict standings for a held-out season
    Predict {
        /// Season under evaluation, e.g. 2020-21
        target: String,
        /// Historical seasons to train on, e.g. 2015-16 2016-17
        #[arg(required = true)]
        seasons: Vec<String>,
        /// Override the ensemble repeat count
        #[arg(short = 'k', long)]
        repeats: Option<usize>,
        /// Pin the ensemble RNG for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    /// Back-to-back schedule difficulty analysis from a game log CSV
    Schedule {
        /// Game log CSV with Team, Season, Date, WL columns
        input: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    /// Create a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Predict {
            target,
            seasons,
            repeats,
            seed,
            format,
        } => commands::predict(&config, &target, &seasons, repeats, seed, format),
        Commands::Schedule { input, format } => commands::schedule(&input, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::OutputFormat;
    use chrono::NaiveDate;
    use hoops::data::{PredictionTarget, RawTable, SeasonLoader, SeasonTable, TrainingCorpus};
    use hoops::predict::{predict_season, Ensemble};
    use hoops::schedule::{averages_by_season, back_to_back_stats, GameResult, TeamScheduleStats};
    use hoops::{AssembledStanding, Config, DeviationRecord, HoopsError, Result};
    use std::path::PathBuf;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.data.data_dir)?;
        println!("Created {}/ directory", config.data.data_dir);

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!(
            "  2. Drop per-season standings.csv and per_game.csv under {}/<season>/",
            config.data.data_dir
        );
        println!("  3. Run 'hoops predict <target-season> <training-seasons>...'");
        Ok(())
    }

    pub fn predict(
        config: &Config,
        target_season: &str,
        seasons: &[String],
        repeats: Option<usize>,
        seed: Option<u64>,
        format: OutputFormat,
    ) -> Result<()> {
        let loader = SeasonLoader::new(config.league.size, config.league.drop_columns.clone());

        let mut history = Vec::with_capacity(seasons.len());
        for season in seasons {
            history.push(load_season(config, &loader, season)?);
        }
        let corpus = TrainingCorpus::build(&history)?;
        let target = PredictionTarget::from_season(&load_season(config, &loader, target_season)?);

        let repeats = repeats.unwrap_or(config.ensemble.repeats);
        let seed = seed.or(config.ensemble.seed);
        let ensemble = Ensemble::new(repeats, seed)?;
        log::info!(
            "Predicting {} from {} training seasons, {} ensemble repeats",
            target_season,
            seasons.len(),
            repeats
        );

        let (standings, report) = predict_season(&corpus, &target, &ensemble)?;

        match format {
            OutputFormat::Table => print_standings_table(&standings, &report),
            OutputFormat::Json => {
                let payload = serde_json::json!({
                    "standings": standings,
                    "deviations": report,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload)
                        .map_err(|e| HoopsError::Config(format!("JSON encoding failed: {}", e)))?
                );
            }
            OutputFormat::Csv => write_deviations_csv(&report)?,
        }
        Ok(())
    }

    pub fn schedule(input: &str, format: OutputFormat) -> Result<()> {
        let table = RawTable::from_path(input)?;
        let stats = game_log_stats(&table)?;

        match format {
            OutputFormat::Table => print_schedule_table(&stats),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&stats)
                    .map_err(|e| HoopsError::Config(format!("JSON encoding failed: {}", e)))?
            ),
            OutputFormat::Csv => write_schedule_csv(&stats)?,
        }
        Ok(())
    }

    fn load_season(config: &Config, loader: &SeasonLoader, season: &str) -> Result<SeasonTable> {
        let dir = PathBuf::from(&config.data.data_dir).join(season);
        let standings = RawTable::from_path(dir.join("standings.csv"))?;
        let per_game = RawTable::from_path(dir.join("per_game.csv"))?;
        loader.load(season, &standings, &per_game)
    }

    /// Group a game log table by (team, season) and compute back-to-back
    /// splits for each group.
    fn game_log_stats(table: &RawTable) -> Result<Vec<TeamScheduleStats>> {
        let mut keys: Vec<(String, String)> = Vec::new();
        let mut logs: std::collections::HashMap<(String, String), Vec<GameResult>> =
            std::collections::HashMap::new();

        for row in 0..table.rows().len() {
            let team = table.cell(row, "Team")?.to_string();
            let season = table.cell(row, "Season")?.to_string();
            let date_str = table.cell(row, "Date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                HoopsError::BadValue {
                    column: "Date".to_string(),
                    value: date_str.to_string(),
                    message: e.to_string(),
                }
            })?;
            let won = match table.cell(row, "WL")? {
                "W" => true,
                "L" => false,
                other => {
                    return Err(HoopsError::BadValue {
                        column: "WL".to_string(),
                        value: other.to_string(),
                        message: "expected W or L".to_string(),
                    })
                }
            };

            let key = (team, season);
            if !logs.contains_key(&key) {
                keys.push(key.clone());
            }
            logs.entry(key).or_default().push(GameResult { date, won });
        }

        Ok(keys
            .into_iter()
            .map(|key| {
                let mut games = logs.remove(&key).unwrap_or_default();
                // Source logs may be reverse chronological.
                games.sort_by_key(|g| g.date);
                back_to_back_stats(&key.0, &key.1, &games)
            })
            .collect())
    }

    fn print_standings_table(standings: &[AssembledStanding], report: &[DeviationRecord]) {
        println!("{:<5} {:<26} {:>10} {:>7} {:>6}", "Rank", "Team", "Score", "Actual", "Diff");
        for (standing, record) in standings.iter().zip(report) {
            println!(
                "{:<5} {:<26} {:>10.2} {:>7} {:>+6}",
                standing.predicted_rank,
                standing.team,
                standing.rank_score,
                record.actual_rank,
                record.difference
            );
        }
    }

    fn write_deviations_csv(report: &[DeviationRecord]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(std::io::stdout());
        for record in report {
            writer.serialize(record).map_err(|e| HoopsError::Source {
                path: "stdout".to_string(),
                source: e,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn print_schedule_table(stats: &[TeamScheduleStats]) {
        println!(
            "{:<10} {:<26} {:>8} {:>9} {:>9} {:>5}",
            "Season", "Team", "Win%", "B2B Win%", "Rest Win%", "B2Bs"
        );
        for s in stats {
            println!(
                "{:<10} {:<26} {:>8.3} {:>9} {:>9} {:>5}",
                s.season,
                s.team,
                s.total_win_pct,
                fmt_pct(s.back_to_back_win_pct),
                fmt_pct(s.non_back_to_back_win_pct),
                s.back_to_backs
            );
        }

        println!("\nSeason averages:");
        for (season, avg) in averages_by_season(stats) {
            println!(
                "{:<10} back-to-back {:>7}, rest {:>7}, {:.1} back-to-backs/team",
                season,
                fmt_pct(avg.back_to_back_win_pct),
                fmt_pct(avg.non_back_to_back_win_pct),
                avg.back_to_backs
            );
        }
    }

    fn write_schedule_csv(stats: &[TeamScheduleStats]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(std::io::stdout());
        for s in stats {
            writer.serialize(s).map_err(|e| HoopsError::Source {
                path: "stdout".to_string(),
                source: e,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn fmt_pct(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.3}", v),
            None => "-".to_string(),
        }
    }
}
