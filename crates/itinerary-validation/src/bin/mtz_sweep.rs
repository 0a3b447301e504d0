use anyhow::{ensure, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use itinerary_milp::MilpConfig;
use itinerary_validation::{sweep, Comparison};

/// Solves seeded random instances with the MILP and by brute force and
/// prints one CSV row per instance.
#[derive(Parser)]
#[command(name = "mtz-sweep", version, about, long_about = None)]
struct Cli {
    /// Number of instances
    #[arg(long, default_value_t = 200)]
    instances: u64,

    /// Seed of the first instance; the rest follow consecutively
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// MILP wall-clock cap per instance, in seconds
    #[arg(long, default_value_t = 30.0)]
    time_limit: f64,

    /// Exit non-zero when any instance disagrees
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MilpConfig {
        time_limit_secs: cli.time_limit,
        ..MilpConfig::default()
    };

    let rows = sweep(cli.instances, cli.seed, config);
    println!("{}", Comparison::CSV_HEADER);
    for row in &rows {
        println!("{row}");
    }

    let disagreements = rows.iter().filter(|r| !r.agree()).count();
    info!(instances = rows.len(), disagreements, "sweep finished");
    if cli.strict {
        ensure!(disagreements == 0, "{disagreements} of {} instances disagree", rows.len());
    }
    Ok(())
}
