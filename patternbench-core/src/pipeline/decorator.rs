//! Chained-wrapper composition.
//!
//! `ThresholdStage -> AverageStage -> SinkStage`. Each stage re-parses the
//! message it receives and forwards a re-serialized record inward. The
//! threshold stage has to compute the average to decide, and the average
//! stage computes it again: a passing message is parsed three times and
//! transformed twice.

use crate::codec;
use crate::error::PipelineResult;
use crate::sink::Sink;
use crate::transform::{compute_average, passes_threshold};

use super::Stage;

/// Terminal stage: writes every record it receives.
pub struct SinkStage<'a> {
    sink: &'a mut dyn Sink,
}

impl<'a> SinkStage<'a> {
    pub fn new(sink: &'a mut dyn Sink) -> Self {
        Self { sink }
    }
}

impl Stage for SinkStage<'_> {
    fn process(&mut self, message: &str) -> PipelineResult<()> {
        let record = codec::deserialize(message)?;
        self.sink.write_line(&codec::serialize(&record)?)
    }
}

/// Computes the average and forwards unconditionally.
pub struct AverageStage<'a> {
    inner: Box<dyn Stage + 'a>,
}

impl<'a> AverageStage<'a> {
    pub fn new(inner: Box<dyn Stage + 'a>) -> Self {
        Self { inner }
    }
}

impl Stage for AverageStage<'_> {
    fn process(&mut self, message: &str) -> PipelineResult<()> {
        let mut record = codec::deserialize(message)?;
        compute_average(&mut record);
        self.inner.process(&codec::serialize(&record)?)
    }
}

/// Computes the average and forwards only records at or above the threshold.
pub struct ThresholdStage<'a> {
    inner: Box<dyn Stage + 'a>,
    threshold: f64,
}

impl<'a> ThresholdStage<'a> {
    pub fn new(inner: Box<dyn Stage + 'a>, threshold: f64) -> Self {
        Self { inner, threshold }
    }
}

impl Stage for ThresholdStage<'_> {
    fn process(&mut self, message: &str) -> PipelineResult<()> {
        let mut record = codec::deserialize(message)?;
        compute_average(&mut record);
        if passes_threshold(&record, self.threshold) {
            self.inner.process(&codec::serialize(&record)?)
        } else {
            Ok(())
        }
    }
}
