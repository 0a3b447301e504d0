use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use itinerary_core::{ItineraryStatus, SolveInput};
use itinerary_planner::{Planner, PlannerConfig, StrategyKind};

#[derive(Parser)]
#[command(name = "itinerary", version, about = "Multi-city itinerary optimizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a request and print the itinerary as JSON
    Solve {
        /// JSON file with the request, offers, hotels, cars and locations
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Planner configuration (JSON); missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Seed for the Pareto search
        #[arg(long)]
        seed: Option<u64>,

        /// MILP wall-clock cap, in seconds
        #[arg(long)]
        time_limit: Option<f64>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the default planner configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Exact,
    Pareto,
    Auto,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exact => StrategyKind::Exact,
            StrategyArg::Pareto => StrategyKind::Pareto,
            StrategyArg::Auto => StrategyKind::Auto,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Command-line flags win over the configuration file.
fn apply_overrides(
    mut config: PlannerConfig,
    strategy: Option<StrategyArg>,
    seed: Option<u64>,
    time_limit: Option<f64>,
) -> PlannerConfig {
    if let Some(strategy) = strategy {
        config.strategy = strategy.into();
    }
    if seed.is_some() {
        config.nsga.seed = seed;
    }
    if let Some(secs) = time_limit {
        config.milp.time_limit_secs = secs;
    }
    config
}

/// 0 for an itinerary, 2 when none exists, 1 on error.
fn exit_status(status: ItineraryStatus) -> u8 {
    match status {
        ItineraryStatus::Optimal => 0,
        ItineraryStatus::Infeasible => 2,
        ItineraryStatus::Error => 1,
    }
}

fn solve(
    input: &Path,
    config: Option<&Path>,
    strategy: Option<StrategyArg>,
    seed: Option<u64>,
    time_limit: Option<f64>,
    compact: bool,
) -> Result<ExitCode> {
    let planner_config: PlannerConfig = match config {
        Some(path) => read_json(path)?,
        None => PlannerConfig::default(),
    };
    let planner_config = apply_overrides(planner_config, strategy, seed, time_limit);

    let input: SolveInput = read_json(input)?;
    debug!(offers = input.offers.len(), hotels = input.hotels.len(), cars = input.cars.len(), "loaded input");
    let itinerary = Planner::new(planner_config).plan(&input);

    let json = if compact {
        serde_json::to_string(&itinerary)?
    } else {
        serde_json::to_string_pretty(&itinerary)?
    };
    println!("{json}");

    Ok(ExitCode::from(exit_status(itinerary.status)))
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Solve {
            input,
            config,
            strategy,
            seed,
            time_limit,
            compact,
        } => solve(&input, config.as_deref(), strategy, seed, time_limit, compact),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&PlannerConfig::default())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_status() {
        assert_eq!(exit_status(ItineraryStatus::Optimal), 0);
        assert_eq!(exit_status(ItineraryStatus::Infeasible), 2);
        assert_eq!(exit_status(ItineraryStatus::Error), 1);
    }

    #[test]
    fn flags_override_the_file() {
        let mut file = PlannerConfig::default();
        file.milp.time_limit_secs = 5.0;
        file.nsga.seed = Some(1);

        let merged = apply_overrides(file.clone(), Some(StrategyArg::Pareto), Some(9), Some(0.5));
        assert_eq!(merged.strategy, StrategyKind::Pareto);
        assert_eq!(merged.nsga.seed, Some(9));
        assert_eq!(merged.milp.time_limit_secs, 0.5);

        let untouched = apply_overrides(file.clone(), None, None, None);
        assert_eq!(untouched.strategy, file.strategy);
        assert_eq!(untouched.nsga.seed, Some(1));
        assert_eq!(untouched.milp.time_limit_secs, 5.0);
    }

    #[test]
    fn solve_arguments_parse() {
        let cli = Cli::try_parse_from(["itinerary", "solve", "in.json", "--strategy", "exact", "--seed", "3", "--compact"])
            .unwrap();
        match cli.command {
            Command::Solve {
                input,
                strategy,
                seed,
                time_limit,
                compact,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.json"));
                assert!(matches!(strategy, Some(StrategyArg::Exact)));
                assert_eq!(seed, Some(3));
                assert_eq!(time_limit, None);
                assert!(compact);
            }
            Command::Config => panic!("parsed the wrong subcommand"),
        }
    }
}
