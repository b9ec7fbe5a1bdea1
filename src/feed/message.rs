//! Wire messages exchanged with the streaming backend.
//!
//! One JSON object per line; the `type` field selects the kind. Only the
//! fields the tracker consumes are declared; serde ignores the rest, so
//! extra backend fields (sample indices, batch descriptions, server time)
//! never break decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{Measurement, ParamValues};

/// Inbound message kinds.
///
/// Unrecognized `type` values decode as [`StreamMessage::Unknown`] so the
/// dispatcher can log and drop them without failing the frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Latest state for every active batch, sent once after connect.
    ///
    /// Keys are batch ids as JSON object keys, i.e. strings; the
    /// dispatcher parses them and drops entries with non-numeric ids.
    InitialState { data: BTreeMap<String, UnitSnapshot> },
    /// One new sample for one batch.
    BatchUpdate {
        batch_number: u32,
        data_point: DataPoint,
        comparison: Comparison,
    },
    /// Heartbeat reply; carries no payload semantics.
    Pong,
    #[serde(other)]
    Unknown,
}

/// Per-batch payload inside the initial snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub data_point: DataPoint,
    pub comparison: Comparison,
}

/// One raw sensor sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DataPoint {
    /// Elapsed process time in hours.
    pub timestamp: f64,
    pub ph: f64,
    pub temperature: f64,
    pub co2: f64,
}

/// Precomputed comparison against the golden standard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Comparison {
    pub actual: ParamValues,
    pub ideal: ParamValues,
    pub quality_score: f64,
}

/// Combine a raw sample and its comparison into a tracker measurement.
///
/// The timestamp comes from the sample; readings come from the comparison,
/// which carries the backend's rounded values alongside the ideals.
pub fn to_measurement(point: &DataPoint, comparison: &Comparison) -> Measurement {
    Measurement {
        timestamp: point.timestamp,
        actual: comparison.actual,
        ideal: comparison.ideal,
        score: comparison.quality_score,
    }
}

/// Outbound heartbeat frame, newline-terminated.
pub fn ping_line() -> String {
    let mut line = serde_json::json!({"type": "ping"}).to_string();
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_batch_update() {
        let raw = r#"{
            "type": "batch_update",
            "batch_number": 2,
            "data_point": {
                "batch_number": 2,
                "batch_status": "perfect",
                "expected_quality_score": 100,
                "description": "Reference batch",
                "timestamp": 1.5,
                "ph": 5.67,
                "temperature": 19.2,
                "co2": 2.4,
                "sample_index": 3,
                "total_samples": 144
            },
            "comparison": {
                "batch_number": 2,
                "sample_index": 3,
                "timestamp": 1.5,
                "actual": {"ph": 5.67, "temperature": 19.2, "co2": 2.4},
                "ideal": {"ph": 5.68, "temperature": 19.25, "co2": 2.38},
                "deviations": {"ph": 0.01, "temperature": 0.05, "co2": 0.02},
                "status": {"ph": "normal", "temperature": "normal", "co2": "normal", "overall": "perfect"},
                "quality_score": 99.3,
                "batch_status": "perfect",
                "expected_quality": 100
            },
            "server_time": "2024-01-01T10:00:00"
        }"#;

        let message: StreamMessage = serde_json::from_str(raw).unwrap();
        match message {
            StreamMessage::BatchUpdate {
                batch_number,
                data_point,
                comparison,
            } => {
                assert_eq!(batch_number, 2);
                assert_eq!(data_point.timestamp, 1.5);
                assert_eq!(comparison.quality_score, 99.3);
                assert_eq!(comparison.ideal.temperature, 19.25);

                let m = to_measurement(&data_point, &comparison);
                assert_eq!(m.timestamp, 1.5);
                assert_eq!(m.actual.ph, 5.67);
                assert_eq!(m.score, 99.3);
            }
            other => panic!("expected BatchUpdate, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_initial_state_keeps_string_keys() {
        let raw = r#"{
            "type": "initial_state",
            "data": {
                "1": {
                    "data_point": {"timestamp": 0.5, "ph": 5.7, "temperature": 18.4, "co2": 0.9},
                    "comparison": {
                        "actual": {"ph": 5.7, "temperature": 18.4, "co2": 0.9},
                        "ideal": {"ph": 5.71, "temperature": 18.5, "co2": 0.95},
                        "quality_score": 98.2
                    },
                    "timestamp": "2024-01-01T10:00:00"
                },
                "3": {
                    "data_point": {"timestamp": 0.5, "ph": 5.2, "temperature": 21.9, "co2": 3.4},
                    "comparison": {
                        "actual": {"ph": 5.2, "temperature": 21.9, "co2": 3.4},
                        "ideal": {"ph": 5.71, "temperature": 18.5, "co2": 0.95},
                        "quality_score": 62.8
                    }
                }
            }
        }"#;

        let message: StreamMessage = serde_json::from_str(raw).unwrap();
        match message {
            StreamMessage::InitialState { data } => {
                assert_eq!(data.len(), 2);
                assert!(data.contains_key("1"));
                assert!(data.contains_key("3"));
                assert_eq!(data["3"].comparison.quality_score, 62.8);
            }
            other => panic!("expected InitialState, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_pong_and_unknown() {
        assert!(matches!(
            serde_json::from_str::<StreamMessage>(r#"{"type":"pong"}"#).unwrap(),
            StreamMessage::Pong
        ));
        assert!(matches!(
            serde_json::from_str::<StreamMessage>(r#"{"type":"server_notice","detail":"x"}"#)
                .unwrap(),
            StreamMessage::Unknown
        ));
    }

    #[test]
    fn test_malformed_frame_fails_decode() {
        assert!(serde_json::from_str::<StreamMessage>("not json").is_err());
        assert!(serde_json::from_str::<StreamMessage>(r#"{"no_type": true}"#).is_err());
        // Right tag, wrong payload shape
        assert!(serde_json::from_str::<StreamMessage>(r#"{"type":"batch_update"}"#).is_err());
    }

    #[test]
    fn test_ping_line_is_newline_terminated_json() {
        let line = ping_line();
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["type"], "ping");
    }

    #[test]
    fn test_encode_matches_wire_shape() {
        // The demo feed serializes through the same types the decoder uses
        let message = StreamMessage::BatchUpdate {
            batch_number: 4,
            data_point: DataPoint {
                timestamp: 2.0,
                ph: 5.5,
                temperature: 19.0,
                co2: 3.1,
            },
            comparison: Comparison {
                actual: ParamValues {
                    ph: 5.5,
                    temperature: 19.0,
                    co2: 3.1,
                },
                ideal: ParamValues {
                    ph: 5.6,
                    temperature: 19.2,
                    co2: 3.0,
                },
                quality_score: 91.0,
            },
        };

        let line = serde_json::to_string(&message).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "batch_update");
        assert_eq!(value["batch_number"], 4);

        let decoded: StreamMessage = serde_json::from_str(&line).unwrap();
        assert!(matches!(decoded, StreamMessage::BatchUpdate { .. }));
    }
}
