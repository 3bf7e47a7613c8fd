//! Polyhouse Optimizer - Command Line Entry Point
//!
//! Reads one or more parcel JSON files, runs the placement optimizer on each
//! and prints the layouts as JSON or as a text report.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use polyhouse_optimizer::core::config::{OptimizerConfig, OrientationStrategy};
use polyhouse_optimizer::core::error::{OptimizerError, Result};
use polyhouse_optimizer::land::ParcelFile;
use polyhouse_optimizer::optimizer::{
    optimize_batch, optimize_with_timeout, OptimizationRequest, PlacementResult,
};
use serde::Serialize;

/// Place polyhouse modules inside land parcels
#[derive(Parser, Debug)]
#[command(name = "polyhouse-optimizer")]
#[command(about = "Pack rectangular polyhouse modules into irregular land parcels")]
struct Args {
    /// Parcel JSON files ({ "land": {...}, "restricted_zones": [...] })
    #[arg(required = true)]
    parcels: Vec<PathBuf>,

    /// Optimizer config (TOML); missing keys keep their defaults
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Orientation strategy: uniform or multi
    #[arg(long)]
    strategy: Option<String>,

    /// Skip the gap-fill passes
    #[arg(long)]
    no_gap_fill: bool,

    /// In-run deadline in milliseconds (0 = unlimited)
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Wall-clock budget per parcel, enforced from outside the run
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Debug-level logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Per-parcel JSON output
#[derive(Serialize)]
struct ParcelReport {
    parcel: String,
    /// True when the run was interrupted and `result` is partial
    partial: bool,
    result: Option<PlacementResult>,
    error: Option<String>,
}

impl ParcelReport {
    fn new(parcel: String, outcome: Result<PlacementResult>) -> Self {
        match outcome {
            Ok(result) => Self {
                parcel,
                partial: false,
                result: Some(result),
                error: None,
            },
            Err(err) => Self {
                parcel,
                partial: err.partial_result().is_some(),
                result: err.partial_result().cloned(),
                error: Some(err.to_string()),
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "polyhouse_optimizer=debug"
    } else {
        "polyhouse_optimizer=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;

    let mut requests = Vec::with_capacity(args.parcels.len());
    for path in &args.parcels {
        let mut request = OptimizationRequest::from(ParcelFile::load(path)?);
        if request.name.is_none() {
            request.name = Some(path.display().to_string());
        }
        requests.push(request);
    }

    let outcomes = match args.timeout_ms {
        Some(ms) => run_with_budget(requests.clone(), &config, Duration::from_millis(ms))?,
        None => optimize_batch(&requests, &config)?,
    };

    let reports: Vec<ParcelReport> = requests
        .iter()
        .zip(outcomes)
        .map(|(request, outcome)| ParcelReport::new(request.name.clone().unwrap_or_default(), outcome))
        .collect();

    match args.format.as_str() {
        "text" => {
            for report in &reports {
                println!("== {}", report.parcel);
                if let Some(error) = &report.error {
                    println!("error: {}", error);
                }
                if let Some(result) = &report.result {
                    print!("{}", result.summary());
                }
            }
        }
        _ => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    Ok(())
}

/// File config, then command-line overrides, then validation
fn build_config(args: &Args) -> Result<OptimizerConfig> {
    let mut config = match &args.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };

    if let Some(strategy) = &args.strategy {
        config.orientation = match strategy.as_str() {
            "uniform" => OrientationStrategy::Uniform,
            "multi" | "multiOrientation" | "multi_orientation" => OrientationStrategy::MultiOrientation,
            other => {
                return Err(OptimizerError::InvalidConfig(format!(
                    "unknown orientation strategy '{}'",
                    other
                )))
            }
        };
    }
    if args.no_gap_fill {
        config.enable_gap_fill = false;
    }
    if let Some(ms) = args.time_limit_ms {
        config.time_limit_ms = ms;
    }

    config.validated()
}

/// Each parcel on tokio's blocking pool under its own budget
fn run_with_budget(
    requests: Vec<OptimizationRequest>,
    config: &OptimizerConfig,
    budget: Duration,
) -> Result<Vec<Result<PlacementResult>>> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(async {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| tokio::spawn(optimize_with_timeout(request, config.clone(), budget)))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(
                handle
                    .await
                    .unwrap_or_else(|e| Err(OptimizerError::Worker(e.to_string()))),
            );
        }
        outcomes
    }))
}
