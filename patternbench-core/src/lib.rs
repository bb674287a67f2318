//! patternbench core library
//!
//! Telemetry pipeline primitives (record, codec, generator, average
//! transform, threshold filter, sinks) and the three composition variants
//! the benchmark compares: chained decorators, an observer subject, and
//! injected strategies.

pub mod codec;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod transform;

// Re-export commonly used types
pub use error::{PipelineError, PipelineResult};
pub use generator::{seeded_rng, MessageGenerator, DEFAULT_METRIC_COUNT};
pub use pipeline::{build_pipeline, Pattern, Stage};
pub use record::TelemetryRecord;
pub use sink::{MemorySink, Sink, WriterSink};
pub use transform::{compute_average, passes_threshold, DEFAULT_THRESHOLD};
