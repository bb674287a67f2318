// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The synthetic telemetry record flowing through every pipeline.

use serde::{Deserialize, Serialize};

/// One synthetic telemetry reading.
///
/// `average` is derived: it stays `0.0` until
/// [`compute_average`](crate::transform::compute_average) runs on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Opaque identifier, `t-<index>` for generated records
    pub id: String,
    /// Milliseconds since the Unix epoch at generation time
    #[serde(rename = "ts")]
    pub timestamp: i64,
    /// Metric values; index `i` is the i-th metric
    pub metrics: Vec<f64>,
    /// Mean of `metrics`, set by the transform
    #[serde(rename = "avg", default)]
    pub average: f64,
}

impl TelemetryRecord {
    /// Create an untransformed record.
    pub fn new(id: impl Into<String>, timestamp: i64, metrics: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            metrics,
            average: 0.0,
        }
    }

    /// Identifier used for the record generated at `index`.
    pub fn id_for_index(index: u64) -> String {
        format!("t-{}", index)
    }
}
