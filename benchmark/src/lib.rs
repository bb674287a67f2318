// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! patternbench benchmarking framework
//!
//! Times the decorator, observer and strategy compositions of the telemetry
//! pipeline on identical generated input and records the results.
//!
//! # Outputs
//!
//! - **Result line**: one JSON line per run on stdout
//! - **Result row**: one row per run in the SQLite `benchmark_results` table
//! - **Report**: optional pretty JSON file covering every run of an invocation

pub mod config;
pub mod harness;
pub mod metrics;
pub mod reporter;
pub mod store;

pub use config::{BenchConfig, ConfigError, ConfigLoader};
pub use harness::{sink_path_for, BenchmarkHarness, RunOutcome};
pub use metrics::{
    BenchmarkReport, BenchmarkResult, EnergyMetrics, ResultLine, SystemInfo, ThroughputMetrics,
};
pub use reporter::{JsonReporter, ReporterError};
pub use store::{BenchmarkRow, ResultStore, SqliteStore, StoreError};
