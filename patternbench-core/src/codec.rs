// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON codec for [`TelemetryRecord`].
//!
//! Stateless free functions over `serde_json`. Unknown fields are ignored on
//! decode; `id`, `ts` and `metrics` are required, `avg` defaults to `0.0`.

use crate::error::{PipelineError, PipelineResult};
use crate::record::TelemetryRecord;

/// Serialize a record to its single-line JSON form.
pub fn serialize(record: &TelemetryRecord) -> PipelineResult<String> {
    serde_json::to_string(record).map_err(|e| PipelineError::Encode {
        reason: e.to_string(),
    })
}

/// Parse a record from JSON text.
///
/// Returns [`PipelineError::MalformedInput`] when the text is not JSON or a
/// required field is missing.
pub fn deserialize(text: &str) -> PipelineResult<TelemetryRecord> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MessageGenerator;
    use crate::transform::compute_average;

    fn sample() -> TelemetryRecord {
        let mut record = TelemetryRecord::new("t-3", 1_712_345_678_901, vec![0.1, 0.2, 0.7]);
        record.average = 1.0 / 3.0;
        record
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let record = sample();
        let text = serialize(&record).unwrap();
        let decoded = deserialize(&text).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_generated_records_round_trip_exactly() {
        let generator = MessageGenerator::new(5);
        for index in 0..20_000 {
            let mut record = generator.record_at(index, 1_712_345_678_901);
            compute_average(&mut record);

            let decoded = deserialize(&serialize(&record).unwrap()).unwrap();
            assert_eq!(decoded.id, record.id);
            assert_eq!(decoded.timestamp, record.timestamp);
            for (got, want) in decoded.metrics.iter().zip(&record.metrics) {
                assert_eq!(got.to_bits(), want.to_bits(), "metric of {} drifted", record.id);
            }
            assert_eq!(decoded.metrics.len(), record.metrics.len());
            assert_eq!(decoded.average.to_bits(), record.average.to_bits());
        }
    }

    #[test]
    fn test_wire_keys() {
        let text = serialize(&sample()).unwrap();
        assert!(text.starts_with(r#"{"id":"t-3","ts":1712345678901,"metrics":["#));
        assert!(text.contains(r#""avg":"#));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_missing_average_defaults_to_zero() {
        let decoded = deserialize(r#"{"id":"t-1","ts":5,"metrics":[0.5]}"#).unwrap();
        assert_eq!(decoded.average, 0.0);
        assert_eq!(decoded.metrics, vec![0.5]);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let decoded =
            deserialize(r#"{"id":"t-1","ts":5,"metrics":[],"status":"OK","extra":{"a":1}}"#)
                .unwrap();
        assert_eq!(decoded.id, "t-1");
        assert!(decoded.metrics.is_empty());
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = deserialize("{not json").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_required_fields_are_malformed() {
        for text in [
            r#"{"ts":5,"metrics":[]}"#,
            r#"{"id":"t-1","metrics":[]}"#,
            r#"{"id":"t-1","ts":5}"#,
        ] {
            let err = deserialize(text).unwrap_err();
            assert!(
                matches!(err, PipelineError::MalformedInput { .. }),
                "expected malformed input for {}",
                text
            );
        }
    }
}
