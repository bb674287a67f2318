// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Publish/subscribe composition.
//!
//! A [`TelemetrySubject`] hands every published message to its observers in
//! registration order. The benchmark registers a single
//! [`ProcessorObserver`] that does the whole transform/filter/write step.

use crate::codec;
use crate::error::PipelineResult;
use crate::sink::Sink;
use crate::transform::{compute_average, passes_threshold};

use super::Stage;

/// Receives every message published on a subject.
pub trait TelemetryObserver {
    fn on_message(&mut self, message: &str) -> PipelineResult<()>;
}

/// Ordered list of observers.
#[derive(Default)]
pub struct TelemetrySubject<'a> {
    observers: Vec<Box<dyn TelemetryObserver + 'a>>,
}

impl<'a> TelemetrySubject<'a> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn register(&mut self, observer: Box<dyn TelemetryObserver + 'a>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `message` to each observer in order.
    ///
    /// With no observers the message is dropped. The first observer error is
    /// returned and later observers do not see the message.
    pub fn publish(&mut self, message: &str) -> PipelineResult<()> {
        for observer in &mut self.observers {
            observer.on_message(message)?;
        }
        Ok(())
    }
}

impl Stage for TelemetrySubject<'_> {
    fn process(&mut self, message: &str) -> PipelineResult<()> {
        self.publish(message)
    }
}

/// Parses, averages, filters and writes passing records.
pub struct ProcessorObserver<'a> {
    sink: &'a mut dyn Sink,
    threshold: f64,
}

impl<'a> ProcessorObserver<'a> {
    pub fn new(sink: &'a mut dyn Sink, threshold: f64) -> Self {
        Self { sink, threshold }
    }
}

impl TelemetryObserver for ProcessorObserver<'_> {
    fn on_message(&mut self, message: &str) -> PipelineResult<()> {
        let mut record = codec::deserialize(message)?;
        compute_average(&mut record);
        if passes_threshold(&record, self.threshold) {
            self.sink.write_line(&codec::serialize(&record)?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::sink::MemorySink;

    struct Recorder<'a> {
        tag: &'static str,
        log: &'a std::cell::RefCell<Vec<String>>,
    }

    impl TelemetryObserver for Recorder<'_> {
        fn on_message(&mut self, message: &str) -> PipelineResult<()> {
            self.log.borrow_mut().push(format!("{}:{}", self.tag, message));
            Ok(())
        }
    }

    #[test]
    fn test_no_observers_drops_message() {
        let mut subject = TelemetrySubject::new();
        assert_eq!(subject.observer_count(), 0);
        subject.publish("{not json").unwrap();
    }

    #[test]
    fn test_observers_called_in_registration_order() {
        let log = std::cell::RefCell::new(Vec::new());
        let mut subject = TelemetrySubject::new();
        subject.register(Box::new(Recorder { tag: "a", log: &log }));
        subject.register(Box::new(Recorder { tag: "b", log: &log }));
        subject.publish("m1").unwrap();
        subject.publish("m2").unwrap();
        assert_eq!(*log.borrow(), ["a:m1", "b:m1", "a:m2", "b:m2"]);
    }

    #[test]
    fn test_processor_observer_filters() {
        let mut sink = MemorySink::new();
        {
            let mut observer = ProcessorObserver::new(&mut sink, 0.5);
            observer
                .on_message(r#"{"id":"keep","ts":1,"metrics":[0.5]}"#)
                .unwrap();
            observer
                .on_message(r#"{"id":"drop","ts":1,"metrics":[0.4]}"#)
                .unwrap();
        }
        assert_eq!(sink.lines(), [r#"{"id":"keep","ts":1,"metrics":[0.5],"avg":0.5}"#]);
    }

    #[test]
    fn test_malformed_surfaces_from_publish() {
        let mut sink = MemorySink::new();
        {
            let mut subject = TelemetrySubject::new();
            subject.register(Box::new(ProcessorObserver::new(&mut sink, 0.5)));
            let err = subject.publish("{not json").unwrap_err();
            assert!(matches!(err, PipelineError::MalformedInput { .. }));
        }
        assert_eq!(sink.lines_written(), 0);
    }
}
