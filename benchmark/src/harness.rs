// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness driving generate/process iterations.
//!
//! One run generates `messages` records in index order, pushes each through
//! one pipeline variant and times the loop. Sink open and close are outside
//! the timed region.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use patternbench_core::{
    build_pipeline, MessageGenerator, Pattern, PipelineResult, Sink, WriterSink,
    DEFAULT_METRIC_COUNT, DEFAULT_THRESHOLD,
};

/// Default number of messages per run.
pub const DEFAULT_MESSAGE_COUNT: u64 = 100_000;

/// What a single run observed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub pattern: Pattern,
    /// Messages generated and fed to the pipeline
    pub messages: u64,
    /// Records written to the sink
    pub passed: u64,
    /// Messages rejected as malformed
    pub malformed: u64,
    /// Time spent generating and processing
    pub elapsed: Duration,
}

impl RunOutcome {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1_000_000.0
    }
}

/// A benchmark harness for timing pipeline variants.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    /// Untimed messages pushed through a discard sink first
    warmup_messages: u64,
    /// Timed messages per run
    messages: u64,
    /// Metric values per generated record
    metric_count: usize,
    /// Filter threshold
    threshold: f64,
}

impl BenchmarkHarness {
    /// Create a new harness with default settings.
    pub fn new() -> Self {
        Self {
            warmup_messages: 0,
            messages: DEFAULT_MESSAGE_COUNT,
            metric_count: DEFAULT_METRIC_COUNT,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the number of warmup messages.
    pub fn warmup(mut self, messages: u64) -> Self {
        self.warmup_messages = messages;
        self
    }

    /// Set the number of timed messages.
    pub fn messages(mut self, messages: u64) -> Self {
        self.messages = messages;
        self
    }

    pub fn metric_count(mut self, metric_count: usize) -> Self {
        self.metric_count = metric_count;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn message_count(&self) -> u64 {
        self.messages
    }

    pub fn metrics_per_message(&self) -> usize {
        self.metric_count
    }

    pub fn pass_threshold(&self) -> f64 {
        self.threshold
    }

    /// Time one run of `pattern` writing into `sink`.
    ///
    /// Malformed messages are counted and skipped. Any other error ends the
    /// run. The sink is not flushed here.
    pub fn run(&self, pattern: Pattern, sink: &mut dyn Sink) -> PipelineResult<RunOutcome> {
        self.warm_up(pattern)?;

        let generator = MessageGenerator::new(self.metric_count);
        let messages = (0..self.messages).map(|index| generator.generate(index));
        self.run_messages(pattern, sink, messages)
    }

    /// Time `pattern` over an arbitrary message sequence.
    ///
    /// Producing each message is part of the timed region. A message that
    /// fails to parse is counted in [`RunOutcome::malformed`] and skipped.
    pub fn run_messages<I, S>(
        &self,
        pattern: Pattern,
        sink: &mut dyn Sink,
        messages: I,
    ) -> PipelineResult<RunOutcome>
    where
        I: IntoIterator<Item = PipelineResult<S>>,
        S: AsRef<str>,
    {
        let lines_before = sink.lines_written();
        let mut count = 0u64;
        let mut malformed = 0u64;

        let elapsed = {
            let mut pipeline = build_pipeline(pattern, sink, self.threshold);
            let start = Instant::now();
            for message in messages {
                let message = message?;
                if let Err(e) = pipeline.process(message.as_ref()) {
                    if !e.is_per_message() {
                        return Err(e);
                    }
                    malformed += 1;
                    tracing::warn!(pattern = %pattern, index = count, error = %e, "skipping message");
                }
                count += 1;
            }
            start.elapsed()
        };

        let outcome = RunOutcome {
            pattern,
            messages: count,
            passed: sink.lines_written() - lines_before,
            malformed,
            elapsed,
        };

        tracing::debug!(
            pattern = %pattern,
            messages = outcome.messages,
            passed = outcome.passed,
            malformed = outcome.malformed,
            elapsed_ms = outcome.elapsed_ms(),
            "run complete"
        );

        Ok(outcome)
    }

    /// Open the sink (file at `sink_path`, or discard), run, then flush it.
    pub fn run_with_sink_path(
        &self,
        pattern: Pattern,
        sink_path: Option<&Path>,
    ) -> PipelineResult<RunOutcome> {
        match sink_path {
            Some(path) => {
                let mut sink = WriterSink::create(path)?;
                let outcome = self.run(pattern, &mut sink)?;
                sink.finish()?;
                Ok(outcome)
            }
            None => {
                let mut sink = WriterSink::discard();
                let outcome = self.run(pattern, &mut sink)?;
                sink.finish()?;
                Ok(outcome)
            }
        }
    }

    fn warm_up(&self, pattern: Pattern) -> PipelineResult<()> {
        if self.warmup_messages == 0 {
            return Ok(());
        }

        let generator = MessageGenerator::new(self.metric_count);
        let mut sink = WriterSink::discard();
        let mut pipeline = build_pipeline(pattern, &mut sink, self.threshold);
        for index in 0..self.warmup_messages {
            if let Err(e) = pipeline.process(&generator.generate(index)?) {
                if !e.is_per_message() {
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink path for one pattern when several patterns share a base path.
///
/// `out/sink.jsonl` becomes `out/sink.decorator.jsonl`.
pub fn sink_path_for(base: &Path, pattern: Pattern) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sink".to_string());
    let file_name = match base.extension() {
        Some(ext) => format!("{}.{}.{}", stem, pattern, ext.to_string_lossy()),
        None => format!("{}.{}", stem, pattern),
    };
    base.with_file_name(file_name)
}
