// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Pipeline composition variants.
//!
//! Three wirings of the same `parse -> transform -> filter -> serialize -> sink`
//! computation behind one [`Stage`] seam:
//!
//! - [`decorator`]: chained wrapper stages
//! - [`observer`]: a subject broadcasting to registered observers
//! - [`strategy`]: one processor with injected transform and filter strategies
//!
//! For the same ordered input and threshold all three write the same lines.
//! A malformed message returns [`PipelineError::MalformedInput`] and writes
//! nothing; deciding whether to continue is left to the caller.
//!
//! [`PipelineError::MalformedInput`]: crate::error::PipelineError::MalformedInput

pub mod decorator;
pub mod observer;
pub mod strategy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PipelineResult;
use crate::sink::Sink;

pub use decorator::{AverageStage, SinkStage, ThresholdStage};
pub use observer::{ProcessorObserver, TelemetryObserver, TelemetrySubject};
pub use strategy::{
    AverageTransform, FilterStrategy, StrategyProcessor, ThresholdFilter, TransformStrategy,
};

/// A pipeline entry point: consumes one serialized message, may write to the sink.
pub trait Stage {
    fn process(&mut self, message: &str) -> PipelineResult<()>;
}

/// Which composition variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Decorator,
    Observer,
    Strategy,
}

impl Pattern {
    /// All variants, in the order the runner executes them.
    pub const ALL: [Pattern; 3] = [Pattern::Decorator, Pattern::Observer, Pattern::Strategy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Decorator => "decorator",
            Pattern::Observer => "observer",
            Pattern::Strategy => "strategy",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown pattern '{0}' (expected decorator, observer or strategy)")]
pub struct ParsePatternError(String);

impl FromStr for Pattern {
    type Err = ParsePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decorator" => Ok(Pattern::Decorator),
            "observer" => Ok(Pattern::Observer),
            "strategy" => Ok(Pattern::Strategy),
            _ => Err(ParsePatternError(s.to_string())),
        }
    }
}

/// Wire the pipeline for `pattern` around a borrowed sink.
pub fn build_pipeline<'a>(
    pattern: Pattern,
    sink: &'a mut dyn Sink,
    threshold: f64,
) -> Box<dyn Stage + 'a> {
    tracing::debug!(pattern = %pattern, threshold, "building pipeline");

    match pattern {
        Pattern::Decorator => Box::new(ThresholdStage::new(
            Box::new(AverageStage::new(Box::new(SinkStage::new(sink)))),
            threshold,
        )),
        Pattern::Observer => {
            let mut subject = TelemetrySubject::new();
            subject.register(Box::new(ProcessorObserver::new(sink, threshold)));
            Box::new(subject)
        }
        Pattern::Strategy => Box::new(StrategyProcessor::new(
            Box::new(AverageTransform),
            Box::new(ThresholdFilter::new(threshold)),
            sink,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_pattern_round_trip() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.as_str().parse::<Pattern>().unwrap(), pattern);
        }
        assert_eq!("Observer".parse::<Pattern>().unwrap(), Pattern::Observer);
        assert!("visitor".parse::<Pattern>().is_err());
    }

    #[test]
    fn test_pattern_serializes_lowercase() {
        let json = serde_json::to_string(&Pattern::Strategy).unwrap();
        assert_eq!(json, "\"strategy\"");
    }

    #[test]
    fn test_build_pipeline_writes_passing_record() {
        for pattern in Pattern::ALL {
            let mut sink = MemorySink::new();
            {
                let mut pipeline = build_pipeline(pattern, &mut sink, 0.5);
                pipeline
                    .process(r#"{"id":"t-1","ts":1,"metrics":[0.6,0.8]}"#)
                    .unwrap();
                pipeline
                    .process(r#"{"id":"t-2","ts":2,"metrics":[0.1,0.2]}"#)
                    .unwrap();
            }
            assert_eq!(sink.lines_written(), 1, "pattern {}", pattern);
            assert!(sink.lines()[0].contains(r#""id":"t-1""#));
        }
    }
}
