//! Frame dispatcher.
//!
//! The single place where raw feed frames become state changes. Each
//! frame is decoded into a [`StreamMessage`] and applied to the
//! [`BatchStore`]; anything that cannot be decoded or applied is logged
//! and dropped, leaving the store exactly as it was. One bad frame never
//! takes the tracker down.

use tracing::{debug, warn};

use crate::data::{BatchStore, UpdateOutcome};
use crate::feed::message::{to_measurement, StreamMessage};

/// Apply one raw frame to the store.
///
/// Returns the applied updates: one per unit for an initial-state
/// snapshot (in ascending unit order), at most one for a batch update,
/// none for control frames.
pub fn dispatch(store: &mut BatchStore, raw: &str) -> Vec<(u32, UpdateOutcome)> {
    let message: StreamMessage = match serde_json::from_str(raw) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "dropping malformed frame");
            return Vec::new();
        }
    };

    match message {
        StreamMessage::InitialState { data } => {
            let mut outcomes = Vec::with_capacity(data.len());
            for (key, snapshot) in data {
                // Wire unit ids are JSON object keys, so they arrive as text
                let unit_id: u32 = match key.parse() {
                    Ok(id) => id,
                    Err(_) => {
                        warn!(key = %key, "snapshot entry has a non-numeric unit id");
                        continue;
                    }
                };
                let measurement = to_measurement(&snapshot.data_point, &snapshot.comparison);
                match store.apply_update(unit_id, measurement) {
                    Ok(outcome) => outcomes.push((unit_id, outcome)),
                    Err(e) => warn!(unit_id, error = %e, "snapshot entry dropped"),
                }
            }
            debug!(units = outcomes.len(), "initial state applied");
            outcomes
        }
        StreamMessage::BatchUpdate {
            batch_number,
            data_point,
            comparison,
        } => {
            let measurement = to_measurement(&data_point, &comparison);
            match store.apply_update(batch_number, measurement) {
                Ok(outcome) => vec![(batch_number, outcome)],
                Err(e) => {
                    warn!(unit_id = batch_number, error = %e, "update dropped");
                    Vec::new()
                }
            }
        }
        StreamMessage::Pong => {
            debug!("heartbeat pong received");
            Vec::new()
        }
        StreamMessage::Unknown => {
            warn!("dropping frame with unrecognized type");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QualityTier;

    fn update_frame(batch: u32, score: f64) -> String {
        format!(
            r#"{{
                "type": "batch_update",
                "batch_number": {batch},
                "data_point": {{"timestamp": 1.5, "ph": 5.71, "temperature": 19.2, "co2": 0.8}},
                "comparison": {{
                    "actual": {{"ph": 5.71, "temperature": 19.2, "co2": 0.8}},
                    "ideal": {{"ph": 5.70, "temperature": 19.0, "co2": 0.7}},
                    "quality_score": {score}
                }}
            }}"#
        )
    }

    #[test]
    fn test_batch_update_lands_in_the_right_window() {
        let mut store = BatchStore::with_units(4);

        let outcomes = dispatch(&mut store, &update_frame(2, 96.4));

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, 2);
        assert_eq!(outcomes[0].1.tier, QualityTier::Perfect);
        assert_eq!(store.record(2).unwrap().window.len(), 1);
        assert_eq!(store.record(1).unwrap().window.len(), 0);
    }

    #[test]
    fn test_initial_state_replays_every_unit_in_order() {
        let mut store = BatchStore::with_units(4);
        let frame = r#"{
            "type": "initial_state",
            "data": {
                "3": {
                    "data_point": {"timestamp": 0.5, "ph": 5.8, "temperature": 18.9, "co2": 0.1},
                    "comparison": {
                        "actual": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "ideal": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "quality_score": 99.0
                    }
                },
                "1": {
                    "data_point": {"timestamp": 0.5, "ph": 5.9, "temperature": 19.4, "co2": 0.5},
                    "comparison": {
                        "actual": {"ph": 5.9, "temperature": 19.4, "co2": 0.5},
                        "ideal": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "quality_score": 91.2
                    }
                }
            }
        }"#;

        let outcomes = dispatch(&mut store, frame);

        let units: Vec<u32> = outcomes.iter().map(|(id, _)| *id).collect();
        assert_eq!(units, vec![1, 3]);
        assert_eq!(outcomes[0].1.tier, QualityTier::Acceptable);
        assert_eq!(outcomes[1].1.tier, QualityTier::Perfect);
        assert_eq!(store.record(1).unwrap().window.len(), 1);
        assert_eq!(store.record(3).unwrap().window.len(), 1);
    }

    #[test]
    fn test_initial_state_skips_bad_unit_ids() {
        let mut store = BatchStore::with_units(4);
        let frame = r#"{
            "type": "initial_state",
            "data": {
                "vat-seven": {
                    "data_point": {"timestamp": 0.5, "ph": 5.8, "temperature": 18.9, "co2": 0.1},
                    "comparison": {
                        "actual": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "ideal": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "quality_score": 99.0
                    }
                },
                "2": {
                    "data_point": {"timestamp": 0.5, "ph": 5.8, "temperature": 18.9, "co2": 0.1},
                    "comparison": {
                        "actual": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "ideal": {"ph": 5.8, "temperature": 18.9, "co2": 0.1},
                        "quality_score": 99.0
                    }
                }
            }
        }"#;

        let outcomes = dispatch(&mut store, frame);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, 2);
    }

    #[test]
    fn test_unknown_unit_update_is_dropped() {
        let mut store = BatchStore::with_units(4);

        let outcomes = dispatch(&mut store, &update_frame(99, 96.4));

        assert!(outcomes.is_empty());
        assert!(store.records().all(|record| record.window.is_empty()));
    }

    #[test]
    fn test_control_and_unrecognized_frames_are_no_ops() {
        let mut store = BatchStore::with_units(4);

        assert!(dispatch(&mut store, r#"{"type": "pong"}"#).is_empty());
        assert!(dispatch(&mut store, r#"{"type": "server_gossip", "x": 1}"#).is_empty());

        assert!(store.records().all(|record| record.window.is_empty()));
    }

    #[test]
    fn test_malformed_frame_leaves_state_unchanged() {
        let mut store = BatchStore::with_units(4);
        dispatch(&mut store, &update_frame(1, 96.4));

        let outcomes = dispatch(&mut store, "{ not json");

        assert!(outcomes.is_empty());
        assert_eq!(store.record(1).unwrap().window.len(), 1);
    }
}
