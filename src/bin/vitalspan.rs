//! Vitalspan CLI - Command-line interface for the Vitalspan engine
//!
//! Commands:
//! - impact: Aggregate a metric set into a total lifespan impact
//! - target: Solve the daily target for one metric
//! - interactions: List currently-firing metric interactions

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vitalspan::types::{HealthMetric, MetricType, ReportingPeriod, UserProfile};
use vitalspan::{ImpactEngine, TargetGoal, ENGINE_VERSION};

/// Vitalspan - On-device health impact computation and target-solving engine
#[derive(Parser)]
#[command(name = "vitalspan")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Estimate lifespan impact from health metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a metric set into a total lifespan impact
    Impact {
        /// Metrics JSON file: array of readings (use - for stdin)
        #[arg(short, long)]
        metrics: PathBuf,

        /// Profile JSON file
        #[arg(short, long)]
        profile: PathBuf,

        /// Reporting period
        #[arg(long, default_value = "day")]
        period: String,

        /// Pretty-print output
        #[arg(long)]
        pretty: bool,
    },

    /// Solve the daily target for one metric
    Target {
        /// Metrics JSON file: array of readings (use - for stdin)
        #[arg(short, long)]
        metrics: PathBuf,

        /// Profile JSON file
        #[arg(short, long)]
        profile: PathBuf,

        /// Metric type to solve for (e.g. "steps", "sleep_hours")
        #[arg(long)]
        metric_type: String,

        /// Reporting period for the benefit figure
        #[arg(long, default_value = "day")]
        period: String,

        /// Relative improvement factor instead of a neutral goal
        #[arg(long)]
        improvement: Option<f64>,

        /// Pretty-print output
        #[arg(long)]
        pretty: bool,
    },

    /// List currently-firing metric interactions
    Interactions {
        /// Metrics JSON file: array of readings (use - for stdin)
        #[arg(short, long)]
        metrics: PathBuf,

        /// Pretty-print output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Impact {
            metrics,
            profile,
            period,
            pretty,
        } => {
            let metrics = read_metrics(&metrics)?;
            let profile = read_profile(&profile)?;
            let period: ReportingPeriod = period.parse()?;

            let engine = ImpactEngine::new();
            let total = engine.total_impact(&metrics, &profile, period);
            emit(&total, pretty)
        }

        Commands::Target {
            metrics,
            profile,
            metric_type,
            period,
            improvement,
            pretty,
        } => {
            let metrics = read_metrics(&metrics)?;
            let profile = read_profile(&profile)?;
            let metric_type: MetricType = metric_type.parse()?;
            let period: ReportingPeriod = period.parse()?;

            let metric = metrics
                .iter()
                .filter(|m| m.metric_type == metric_type)
                .max_by_key(|m| m.date)
                .ok_or_else(|| format!("no reading for {metric_type} in the metric set"))?;

            let mut engine = ImpactEngine::new();
            match improvement {
                // An explicit improvement goal bypasses the neutral-target cache
                Some(factor) => {
                    let solved =
                        engine.solve_target(metric, &profile, TargetGoal::RelativeImprovement(factor));
                    emit(&solved, pretty)
                }
                None => {
                    let target = engine.daily_target(metric, &profile, period);
                    emit(&target, pretty)
                }
            }
        }

        Commands::Interactions { metrics, pretty } => {
            let metrics = read_metrics(&metrics)?;
            let engine = ImpactEngine::new();
            emit(&engine.active_interactions(&metrics), pretty)
        }
    }
}

fn read_metrics(path: &Path) -> Result<Vec<HealthMetric>, String> {
    let data = read_input(path)?;
    serde_json::from_str(&data).map_err(|e| format!("metrics: {e}"))
}

fn read_profile(path: &Path) -> Result<UserProfile, String> {
    let data = read_input(path)?;
    serde_json::from_str(&data).map_err(|e| format!("profile: {e}"))
}

fn read_input(path: &Path) -> Result<String, String> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err("refusing to read JSON from a terminal; pipe a file or pass a path".into());
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| e.to_string())?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
    }
}

fn emit<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
