// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI to benchmark the pipeline compositions.
//!
//! Prints one JSON result line per pattern to stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, ValueEnum};
use patternbench_benchmark::config::validate_threshold;
use patternbench_benchmark::{
    sink_path_for, BenchConfig, BenchmarkHarness, BenchmarkReport, BenchmarkResult, BenchmarkRow,
    ConfigLoader, JsonReporter, ResultLine, ResultStore, SqliteStore, ThroughputMetrics,
};
use patternbench_core::Pattern;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PatternChoice {
    All,
    Decorator,
    Observer,
    Strategy,
}

impl PatternChoice {
    fn patterns(self) -> Vec<Pattern> {
        match self {
            PatternChoice::All => Pattern::ALL.to_vec(),
            PatternChoice::Decorator => vec![Pattern::Decorator],
            PatternChoice::Observer => vec![Pattern::Observer],
            PatternChoice::Strategy => vec![Pattern::Strategy],
        }
    }
}

#[derive(Parser)]
#[command(name = "run_pipeline")]
#[command(about = "Benchmark decorator, observer and strategy compositions of a telemetry pipeline")]
struct Args {
    /// Number of messages per run
    #[arg(default_value_t = 100_000)]
    message_count: u64,

    /// Metric values per message
    #[arg(default_value_t = 50)]
    metric_count: usize,

    /// File receiving passing records (discarded if omitted)
    sink_path: Option<PathBuf>,

    /// Composition to run
    #[arg(short, long, value_enum, default_value_t = PatternChoice::All)]
    pattern: PatternChoice,

    /// Filter threshold (overrides config)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database for result rows (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Do not insert result rows
    #[arg(long)]
    no_persist: bool,

    /// Directory for a JSON report of this invocation (overrides config)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Measured average power draw in watts, used to fill energy columns
    #[arg(long)]
    average_power_w: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    let patterns = args.pattern.patterns();

    let harness = BenchmarkHarness::new()
        .warmup(config.warmup_messages)
        .messages(args.message_count)
        .metric_count(args.metric_count)
        .threshold(config.threshold);

    tracing::info!(
        messages = args.message_count,
        metrics = args.metric_count,
        threshold = config.threshold,
        patterns = patterns.len(),
        "starting benchmark"
    );

    let mut store = if config.persist {
        match SqliteStore::open(&config.database_path) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::error!(error = %e, "result rows will not be persisted");
                None
            }
        }
    } else {
        None
    };

    let mut report = config.report_dir.as_ref().map(|_| BenchmarkReport::new());

    for &pattern in &patterns {
        let sink_path = args.sink_path.as_ref().map(|path| {
            if patterns.len() > 1 {
                sink_path_for(path, pattern)
            } else {
                path.clone()
            }
        });

        let outcome = harness
            .run_with_sink_path(pattern, sink_path.as_deref())
            .with_context(|| format!("{} run failed", pattern))?;

        let mut result = BenchmarkResult::from_outcome(
            &outcome,
            config.language.as_str(),
            args.metric_count,
            config.threshold,
        );
        if let Some(power) = args.average_power_w {
            result = result.with_power(power);
            tracing::info!(
                pattern = %pattern,
                energy_j = result.energy.energy_j,
                per_message_j = result.energy.per_message_j(result.messages),
                carbon_kg = result.energy.carbon_kg,
                "energy estimate"
            );
        }

        println!("{}", ResultLine::from(&result).to_json()?);

        tracing::info!(
            pattern = %pattern,
            passed = result.passed,
            malformed = result.malformed,
            rate = %ThroughputMetrics::format_rate(result.throughput.messages_per_sec),
            "run finished"
        );

        if let Some(store) = store.as_mut() {
            let inserted = BenchmarkRow::from_result(&result, Local::now())
                .and_then(|row| store.insert(&row));
            if let Err(e) = inserted {
                tracing::error!(pattern = %pattern, error = %e, "failed to persist result row");
            }
        }

        if let Some(report) = report.as_mut() {
            report.add_result(result);
        }
    }

    if let Some(fastest) = report.as_ref().and_then(|report| report.fastest()) {
        tracing::info!(
            pattern = %fastest.pattern,
            elapsed_ms = fastest.elapsed_ms,
            "fastest composition"
        );
    }

    if let (Some(report), Some(dir)) = (report, config.report_dir.as_ref()) {
        match JsonReporter::new(dir).and_then(|reporter| reporter.save(&report)) {
            Ok(path) => tracing::info!(path = %path.display(), "report saved"),
            Err(e) => tracing::error!(error = %e, "failed to save report"),
        }
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(args: &Args) -> anyhow::Result<BenchConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BenchConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        validate_threshold(threshold)?;
        config.threshold = threshold;
    }
    if let Some(db) = &args.db {
        config.database_path = db.clone();
    }
    if args.no_persist {
        config.persist = false;
    }
    if let Some(dir) = &args.report_dir {
        config.report_dir = Some(dir.clone());
    }

    Ok(config)
}
