//! The shared computation: average transform and threshold filter.
//!
//! Every pipeline variant calls these two functions, directly or through
//! the strategy traits.

use crate::record::TelemetryRecord;

/// Default pass threshold for the filter.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Compute the mean of `record.metrics`, store it in `record.average` and
/// return it. An empty metric list yields `0.0`.
pub fn compute_average(record: &mut TelemetryRecord) -> f64 {
    record.average = if record.metrics.is_empty() {
        0.0
    } else {
        let sum: f64 = record.metrics.iter().sum();
        sum / record.metrics.len() as f64
    };
    record.average
}

/// Inclusive threshold check on an already transformed record.
pub fn passes_threshold(record: &TelemetryRecord, threshold: f64) -> bool {
    record.average >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(metrics: Vec<f64>) -> TelemetryRecord {
        TelemetryRecord::new("t-0", 0, metrics)
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(compute_average(&mut record(vec![])), 0.0);
        assert_eq!(compute_average(&mut record(vec![1.0, 1.0, 1.0])), 1.0);
        assert_eq!(compute_average(&mut record(vec![0.0, 1.0])), 0.5);
    }

    #[test]
    fn test_transform_only_touches_average() {
        let mut r = record(vec![0.2, 0.4]);
        let before = r.clone();
        let avg = compute_average(&mut r);
        assert_eq!(r.average, avg);
        assert_eq!(r.id, before.id);
        assert_eq!(r.timestamp, before.timestamp);
        assert_eq!(r.metrics, before.metrics);
    }

    #[test]
    fn test_transform_idempotent() {
        let mut r = record(vec![0.13, 0.71, 0.99, 0.02]);
        let first = compute_average(&mut r);
        let second = compute_average(&mut r);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_threshold_inclusive() {
        let mut r = record(vec![]);
        r.average = DEFAULT_THRESHOLD;
        assert!(passes_threshold(&r, DEFAULT_THRESHOLD));

        // largest f64 below a positive threshold
        r.average = f64::from_bits(DEFAULT_THRESHOLD.to_bits() - 1);
        assert!(r.average < DEFAULT_THRESHOLD);
        assert!(!passes_threshold(&r, DEFAULT_THRESHOLD));
    }

    #[test]
    fn test_untransformed_record() {
        let r = record(vec![0.9, 0.9]);
        assert!(!passes_threshold(&r, DEFAULT_THRESHOLD));
        assert!(passes_threshold(&r, 0.0));
    }
}
