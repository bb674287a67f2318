// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deterministic synthetic message generator.
//!
//! Each message is seeded from its own index through [`seeded_rng`], so no
//! random state is shared between messages and the metric sequence for a
//! given index is reproducible from run to run.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::codec;
use crate::error::PipelineResult;
use crate::record::TelemetryRecord;

/// Default number of metric values per record.
pub const DEFAULT_METRIC_COUNT: usize = 50;

/// Build the PRNG state for message `index`.
pub fn seeded_rng(index: u64) -> StdRng {
    StdRng::seed_from_u64(index)
}

/// Produces serialized telemetry records from integer indices.
#[derive(Debug, Clone, Copy)]
pub struct MessageGenerator {
    metric_count: usize,
}

impl MessageGenerator {
    pub fn new(metric_count: usize) -> Self {
        Self { metric_count }
    }

    /// Build the record for `index`, stamped with the given timestamp.
    pub fn record_at(&self, index: u64, timestamp_ms: i64) -> TelemetryRecord {
        let mut rng = seeded_rng(index);
        let metrics = (0..self.metric_count)
            .map(|_| rng.random::<f64>())
            .collect();
        TelemetryRecord::new(TelemetryRecord::id_for_index(index), timestamp_ms, metrics)
    }

    /// Generate the serialized message for `index`, stamped with the current time.
    pub fn generate(&self, index: u64) -> PipelineResult<String> {
        self.generate_at(index, Utc::now().timestamp_millis())
    }

    /// Generate the serialized message for `index` with a fixed timestamp.
    pub fn generate_at(&self, index: u64, timestamp_ms: i64) -> PipelineResult<String> {
        codec::serialize(&self.record_at(index, timestamp_ms))
    }
}

impl Default for MessageGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC_COUNT)
    }
}
