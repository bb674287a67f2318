// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Append-only line sinks.
//!
//! A sink is owned by exactly one benchmark run. Pipelines borrow it
//! mutably for the duration of the loop; the run calls [`Sink::finish`]
//! afterwards. [`WriterSink`] also flushes on drop so an early return
//! still releases buffered output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Destination for serialized records that passed the filter.
pub trait Sink {
    /// Append one line. The newline is added by the sink.
    fn write_line(&mut self, line: &str) -> PipelineResult<()>;

    /// Flush buffered output. Called once after the run loop.
    fn finish(&mut self) -> PipelineResult<()>;

    /// Number of lines written so far.
    fn lines_written(&self) -> u64;
}

/// Buffered sink over any `io::Write`.
pub struct WriterSink<W: Write> {
    writer: BufWriter<W>,
    lines: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            lines: 0,
        }
    }
}

impl WriterSink<File> {
    /// Create (or truncate) a sink file.
    pub fn create(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let file = File::create(path.as_ref()).map_err(|e| PipelineError::Sink {
            context: "creating sink file",
            source: e,
        })?;
        Ok(Self::new(file))
    }
}

impl WriterSink<io::Sink> {
    /// A sink that discards everything, like writing to `/dev/null`.
    pub fn discard() -> Self {
        Self::new(io::sink())
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> PipelineResult<()> {
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| PipelineError::Sink {
                context: "writing record",
                source: e,
            })?;
        self.lines += 1;
        Ok(())
    }

    fn finish(&mut self) -> PipelineResult<()> {
        self.writer.flush().map_err(|e| PipelineError::Sink {
            context: "flushing sink",
            source: e,
        })
    }

    fn lines_written(&self) -> u64 {
        self.lines
    }
}

impl<W: Write> Drop for WriterSink<W> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush sink on drop");
        }
    }
}

/// In-memory sink that keeps every line, used to compare pipeline output.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, line: &str) -> PipelineResult<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn finish(&mut self) -> PipelineResult<()> {
        Ok(())
    }

    fn lines_written(&self) -> u64 {
        self.lines.len() as u64
    }
}
