// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result types for benchmark runs.
//!
//! [`ResultLine`] is the one-line stdout summary of a run. [`BenchmarkResult`]
//! carries everything known about a run and feeds the JSON report and the
//! persisted result row.

use chrono::{DateTime, Utc};
use patternbench_core::Pattern;
use serde::{Deserialize, Serialize};
use sysinfo::System;

use crate::harness::RunOutcome;

/// Grid emission factor used for the carbon estimate, kg CO2 per kWh.
pub const DEFAULT_EMISSION_FACTOR_KG_PER_KWH: f64 = 0.6;

/// The machine-readable line printed to stdout after each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultLine {
    pub pattern: Pattern,
    #[serde(rename = "lang")]
    pub language: String,
    pub messages: u64,
    pub elapsed_ms: f64,
}

impl ResultLine {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&BenchmarkResult> for ResultLine {
    fn from(result: &BenchmarkResult) -> Self {
        Self {
            pattern: result.pattern,
            language: result.language.clone(),
            messages: result.messages,
            elapsed_ms: result.elapsed_ms,
        }
    }
}

/// Throughput derived from a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputMetrics {
    /// Messages processed per second
    pub messages_per_sec: f64,
    /// Fraction of messages that reached the sink
    pub pass_rate: f64,
    /// Duration of the timed loop in nanoseconds
    pub duration_ns: u64,
}

impl ThroughputMetrics {
    /// Calculate throughput from message counts and duration.
    pub fn calculate(messages: u64, passed: u64, duration_ns: u64) -> Self {
        let duration_secs = duration_ns as f64 / 1_000_000_000.0;
        let messages_per_sec = if duration_ns == 0 {
            0.0
        } else {
            messages as f64 / duration_secs
        };
        let pass_rate = if messages == 0 {
            0.0
        } else {
            passed as f64 / messages as f64
        };
        Self {
            messages_per_sec,
            pass_rate,
            duration_ns,
        }
    }

    /// Format a message rate in human-readable form.
    pub fn format_rate(messages_per_sec: f64) -> String {
        if messages_per_sec < 1_000.0 {
            format!("{:.2} msg/s", messages_per_sec)
        } else if messages_per_sec < 1_000_000.0 {
            format!("{:.2} K msg/s", messages_per_sec / 1_000.0)
        } else {
            format!("{:.2} M msg/s", messages_per_sec / 1_000_000.0)
        }
    }
}

/// Energy figures for a run. Zero unless an external power reading was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyMetrics {
    pub average_power_w: f64,
    pub energy_j: f64,
    pub energy_kwh: f64,
    pub carbon_kg: f64,
}

impl EnergyMetrics {
    /// Energy from elapsed time and a measured average power draw.
    pub fn from_power(elapsed_ms: f64, average_power_w: f64) -> Self {
        let energy_j = elapsed_ms / 1_000.0 * average_power_w;
        let energy_kwh = energy_j / 3_600_000.0;
        Self {
            average_power_w,
            energy_j,
            energy_kwh,
            carbon_kg: energy_kwh * DEFAULT_EMISSION_FACTOR_KG_PER_KWH,
        }
    }

    /// Energy spent per message processed.
    pub fn per_message_j(&self, messages: u64) -> f64 {
        if messages == 0 {
            0.0
        } else {
            self.energy_j / messages as f64
        }
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Everything recorded about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub pattern: Pattern,
    pub language: String,
    pub messages: u64,
    pub passed: u64,
    pub malformed: u64,
    pub metric_count: usize,
    pub threshold: f64,
    /// Wall-clock time of the timed loop
    pub elapsed_ms: f64,
    pub throughput: ThroughputMetrics,
    pub energy: EnergyMetrics,
}

impl BenchmarkResult {
    pub fn from_outcome(
        outcome: &RunOutcome,
        language: impl Into<String>,
        metric_count: usize,
        threshold: f64,
    ) -> Self {
        Self {
            pattern: outcome.pattern,
            language: language.into(),
            messages: outcome.messages,
            passed: outcome.passed,
            malformed: outcome.malformed,
            metric_count,
            threshold,
            elapsed_ms: outcome.elapsed_ms(),
            throughput: ThroughputMetrics::calculate(
                outcome.messages,
                outcome.passed,
                outcome.elapsed.as_nanos() as u64,
            ),
            energy: EnergyMetrics::default(),
        }
    }

    /// Fill in energy from a measured average power draw.
    pub fn with_power(mut self, average_power_w: f64) -> Self {
        self.energy = EnergyMetrics::from_power(self.elapsed_ms, average_power_w);
        self
    }
}

/// All runs of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub benchmark_suite: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self {
            benchmark_suite: "patternbench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            results: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Fastest run by elapsed time.
    pub fn fastest(&self) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .min_by(|a, b| a.elapsed_ms.total_cmp(&b.elapsed_ms))
    }
}

impl Default for BenchmarkReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn outcome(pattern: Pattern, millis: u64) -> RunOutcome {
        RunOutcome {
            pattern,
            messages: 1000,
            passed: 400,
            malformed: 0,
            elapsed: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_result_line_format() {
        let line = ResultLine {
            pattern: Pattern::Decorator,
            language: "rust".to_string(),
            messages: 5,
            elapsed_ms: 1.25,
        };
        assert_eq!(
            line.to_json().unwrap(),
            r#"{"pattern":"decorator","lang":"rust","messages":5,"elapsed_ms":1.25}"#
        );
    }

    #[test]
    fn test_throughput_calculation() {
        let metrics = ThroughputMetrics::calculate(1000, 250, 1_000_000_000);
        assert!((metrics.messages_per_sec - 1000.0).abs() < 0.01);
        assert!((metrics.pass_rate - 0.25).abs() < 1e-12);

        let empty = ThroughputMetrics::calculate(0, 0, 0);
        assert_eq!(empty.messages_per_sec, 0.0);
        assert_eq!(empty.pass_rate, 0.0);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(ThroughputMetrics::format_rate(500.0), "500.00 msg/s");
        assert_eq!(ThroughputMetrics::format_rate(1500.0), "1.50 K msg/s");
        assert_eq!(ThroughputMetrics::format_rate(2_500_000.0), "2.50 M msg/s");
    }

    #[test]
    fn test_energy_from_power() {
        let energy = EnergyMetrics::from_power(2_000.0, 15.0);
        assert!((energy.energy_j - 30.0).abs() < 1e-9);
        assert!((energy.energy_kwh - 30.0 / 3_600_000.0).abs() < 1e-15);
        assert!((energy.per_message_j(10) - 3.0).abs() < 1e-9);
        assert_eq!(EnergyMetrics::default().energy_j, 0.0);
    }

    #[test]
    fn test_result_from_outcome() {
        let result = BenchmarkResult::from_outcome(&outcome(Pattern::Observer, 100), "rust", 50, 0.5);
        assert_eq!(result.pattern, Pattern::Observer);
        assert_eq!(result.passed, 400);
        assert!((result.elapsed_ms - 100.0).abs() < 1e-9);
        assert!((result.throughput.messages_per_sec - 10_000.0).abs() < 0.01);
        assert_eq!(result.energy, EnergyMetrics::default());

        let line = ResultLine::from(&result);
        assert_eq!(line.messages, 1000);
        assert_eq!(line.language, "rust");
    }

    #[test]
    fn test_report_fastest() {
        let mut report = BenchmarkReport::new();
        assert!(report.fastest().is_none());
        for (pattern, ms) in [
            (Pattern::Decorator, 30),
            (Pattern::Observer, 10),
            (Pattern::Strategy, 20),
        ] {
            report.add_result(BenchmarkResult::from_outcome(&outcome(pattern, ms), "rust", 50, 0.5));
        }
        assert_eq!(report.fastest().unwrap().pattern, Pattern::Observer);
    }

    #[test]
    fn test_system_info_collect() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
        assert!(info.cpu_cores > 0);
    }
}
