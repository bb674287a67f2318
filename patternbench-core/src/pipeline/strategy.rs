//! Strategy-injection composition.
//!
//! [`StrategyProcessor`] owns its control flow (transform, then filter, then
//! maybe write) and takes both computations as trait objects, so either can
//! be swapped without touching the processor.

use crate::codec;
use crate::error::PipelineResult;
use crate::record::TelemetryRecord;
use crate::sink::Sink;
use crate::transform::{compute_average, passes_threshold, DEFAULT_THRESHOLD};

use super::Stage;

/// Computes a derived value on the record.
pub trait TransformStrategy {
    fn apply(&self, record: &mut TelemetryRecord) -> f64;
}

/// Decides whether a transformed record is kept.
pub trait FilterStrategy {
    fn keep(&self, record: &TelemetryRecord) -> bool;
}

/// Mean of the metric values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageTransform;

impl TransformStrategy for AverageTransform {
    fn apply(&self, record: &mut TelemetryRecord) -> f64 {
        compute_average(record)
    }
}

/// Keeps records whose average is at or above the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdFilter {
    threshold: f64,
}

impl ThresholdFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdFilter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FilterStrategy for ThresholdFilter {
    fn keep(&self, record: &TelemetryRecord) -> bool {
        passes_threshold(record, self.threshold)
    }
}

pub struct StrategyProcessor<'a> {
    transform: Box<dyn TransformStrategy + 'a>,
    filter: Box<dyn FilterStrategy + 'a>,
    sink: &'a mut dyn Sink,
}

impl<'a> StrategyProcessor<'a> {
    pub fn new(
        transform: Box<dyn TransformStrategy + 'a>,
        filter: Box<dyn FilterStrategy + 'a>,
        sink: &'a mut dyn Sink,
    ) -> Self {
        Self {
            transform,
            filter,
            sink,
        }
    }

    /// Replace the transform strategy.
    pub fn set_transform(&mut self, transform: Box<dyn TransformStrategy + 'a>) {
        self.transform = transform;
    }

    /// Replace the filter strategy.
    pub fn set_filter(&mut self, filter: Box<dyn FilterStrategy + 'a>) {
        self.filter = filter;
    }

    pub fn handle(&mut self, message: &str) -> PipelineResult<()> {
        let mut record = codec::deserialize(message)?;
        self.transform.apply(&mut record);
        if self.filter.keep(&record) {
            self.sink.write_line(&codec::serialize(&record)?)?;
        }
        Ok(())
    }
}

impl Stage for StrategyProcessor<'_> {
    fn process(&mut self, message: &str) -> PipelineResult<()> {
        self.handle(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::sink::MemorySink;

    /// Max metric value instead of the mean.
    struct MaxTransform;

    impl TransformStrategy for MaxTransform {
        fn apply(&self, record: &mut TelemetryRecord) -> f64 {
            record.average = record.metrics.iter().copied().fold(0.0, f64::max);
            record.average
        }
    }

    struct KeepAll;

    impl FilterStrategy for KeepAll {
        fn keep(&self, _record: &TelemetryRecord) -> bool {
            true
        }
    }

    const LOW: &str = r#"{"id":"t-1","ts":1,"metrics":[0.1,0.9]}"#;

    #[test]
    fn test_default_strategies() {
        let mut sink = MemorySink::new();
        {
            let mut processor = StrategyProcessor::new(
                Box::new(AverageTransform),
                Box::new(ThresholdFilter::default()),
                &mut sink,
            );
            processor.handle(LOW).unwrap();
        }
        // mean is 0.5, inclusive threshold keeps it
        assert_eq!(sink.lines_written(), 1);
    }

    #[test]
    fn test_swapping_strategies_keeps_control_flow() {
        let mut sink = MemorySink::new();
        {
            let mut processor = StrategyProcessor::new(
                Box::new(AverageTransform),
                Box::new(ThresholdFilter::new(0.8)),
                &mut sink,
            );
            processor.handle(LOW).unwrap();

            processor.set_transform(Box::new(MaxTransform));
            processor.handle(LOW).unwrap();

            processor.set_filter(Box::new(KeepAll));
            processor.set_transform(Box::new(AverageTransform));
            processor.handle(LOW).unwrap();
        }
        let lines = sink.into_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""avg":0.9"#));
        assert!(lines[1].contains(r#""avg":0.5"#));
    }

    #[test]
    fn test_malformed_input() {
        let mut sink = MemorySink::new();
        {
            let mut processor = StrategyProcessor::new(
                Box::new(AverageTransform),
                Box::new(ThresholdFilter::default()),
                &mut sink,
            );
            let err = processor.handle("{not json").unwrap_err();
            assert!(matches!(err, PipelineError::MalformedInput { .. }));
        }
        assert_eq!(sink.lines_written(), 0);
    }
}
