//! Parsing and validation of recorded traces

use crate::error::GestureError;
use crate::types::ContactSample;

/// Reads recorded contact samples
pub struct TraceAdapter;

impl TraceAdapter {
    /// Parse a JSON string containing an array of samples
    pub fn parse_array(json: &str) -> Result<Vec<ContactSample>, GestureError> {
        let samples: Vec<ContactSample> = serde_json::from_str(json)?;
        Ok(samples)
    }

    /// Parse NDJSON (newline-delimited JSON), one sample per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<ContactSample>, GestureError> {
        let mut samples = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<ContactSample>(trimmed) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    return Err(GestureError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(samples)
    }

    /// Every unusable sample in a trace, in order
    pub fn validate_samples(samples: &[ContactSample]) -> Vec<SampleValidationResult> {
        let mut previous_ms: Option<u64> = None;
        let mut results = Vec::new();

        for (index, sample) in samples.iter().enumerate() {
            if !sample.x.is_finite() || !sample.y.is_finite() {
                results.push(SampleValidationResult {
                    index,
                    error: SampleValidationError::NonFiniteCoordinate {
                        x: sample.x,
                        y: sample.y,
                    },
                });
            }

            if let Some(previous) = previous_ms {
                if sample.timestamp_ms < previous {
                    results.push(SampleValidationResult {
                        index,
                        error: SampleValidationError::TimestampBackwards {
                            previous_ms: previous,
                            timestamp_ms: sample.timestamp_ms,
                        },
                    });
                }
            }
            previous_ms = Some(previous_ms.map_or(sample.timestamp_ms, |p| p.max(sample.timestamp_ms)));
        }

        results
    }

    /// Fails on the first unusable sample
    pub fn ensure_valid(samples: &[ContactSample]) -> Result<(), GestureError> {
        match Self::validate_samples(samples).into_iter().next() {
            None => Ok(()),
            Some(SampleValidationResult {
                index,
                error:
                    SampleValidationError::TimestampBackwards {
                        previous_ms,
                        timestamp_ms,
                    },
            }) => Err(GestureError::OutOfOrder {
                index,
                previous_ms,
                timestamp_ms,
            }),
            Some(result) => Err(GestureError::InvalidSample(format!(
                "sample {}: {}",
                result.index, result.error
            ))),
        }
    }
}

/// A sample that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct SampleValidationResult {
    pub index: usize,
    pub error: SampleValidationError,
}

/// Why a recorded sample cannot be replayed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleValidationError {
    #[error("Non-finite coordinate: ({x}, {y})")]
    NonFiniteCoordinate { x: f32, y: f32 },

    #[error("Timestamp went backwards: {timestamp_ms}ms after {previous_ms}ms")]
    TimestampBackwards { previous_ms: u64, timestamp_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContactKind, PointerSlot};
    use pretty_assertions::assert_eq;

    const TRACE: &str = r#"
{"kind":"start","x":200.0,"y":200.0,"timestamp_ms":100}
{"kind":"start","pointer_slot":"second","x":300.0,"y":200.0,"timestamp_ms":100}

# secondary lifts first
{"kind":"end","slot":"second","x":300.0,"y":200.0,"timestamp_ms":110}
{"kind":"end","x":200.0,"y":200.0,"timestamp_ms":120}
"#;

    #[test]
    fn test_parse_ndjson() {
        let samples = TraceAdapter::parse_ndjson(TRACE).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], ContactSample::start(200.0, 200.0, 100));
        assert_eq!(samples[1].pointer_slot, PointerSlot::Second);
        assert_eq!(samples[2].pointer_slot, PointerSlot::Second);
        assert_eq!(samples[3].kind, ContactKind::End);
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let err = TraceAdapter::parse_ndjson("{\"kind\":\"start\",\"x\":0,\"y\":0,\"timestamp_ms\":0}\n{\"kind\":\"hover\"}")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"), "got {err}");
    }

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"kind":"start","x":1.0,"y":2.0,"timestamp_ms":5},
            {"kind":"cancel","timestamp_ms":6}
        ]"#;
        let samples = TraceAdapter::parse_array(json).unwrap();
        assert_eq!(
            samples,
            vec![ContactSample::start(1.0, 2.0, 5), ContactSample::cancel(6)]
        );
        assert!(TraceAdapter::parse_array("{").is_err());
    }

    #[test]
    fn test_validate_clean_trace() {
        let samples = TraceAdapter::parse_ndjson(TRACE).unwrap();
        assert!(TraceAdapter::validate_samples(&samples).is_empty());
        assert!(TraceAdapter::ensure_valid(&samples).is_ok());
    }

    #[test]
    fn test_validate_flags_bad_samples() {
        let samples = vec![
            ContactSample::start(0.0, 0.0, 100),
            ContactSample::moved(f32::NAN, 0.0, 110),
            ContactSample::moved(1.0, 0.0, 90),
            ContactSample::end(1.0, 0.0, 105),
        ];
        let results = TraceAdapter::validate_samples(&samples);
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(matches!(
            results[1].error,
            SampleValidationError::TimestampBackwards {
                previous_ms: 110,
                timestamp_ms: 90
            }
        ));
        assert!(matches!(
            results[2].error,
            SampleValidationError::TimestampBackwards {
                previous_ms: 110,
                timestamp_ms: 105
            }
        ));
    }

    #[test]
    fn test_ensure_valid_maps_errors() {
        let backwards = vec![
            ContactSample::start(0.0, 0.0, 100),
            ContactSample::end(0.0, 0.0, 50),
        ];
        assert!(matches!(
            TraceAdapter::ensure_valid(&backwards),
            Err(GestureError::OutOfOrder {
                index: 1,
                previous_ms: 100,
                timestamp_ms: 50
            })
        ));

        let infinite = vec![ContactSample::start(f32::INFINITY, 0.0, 0)];
        assert!(matches!(
            TraceAdapter::ensure_valid(&infinite),
            Err(GestureError::InvalidSample(_))
        ));
    }
}
