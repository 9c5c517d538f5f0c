// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request payload decoding.
//!
//! Workout submissions are accepted in three layouts, tried in order:
//!
//! 1. Envelope: `{"timestamp": t, "weight_lifting": {..}, "running": {..}}`
//!    (`date` is accepted in place of, or alongside, `timestamp`).
//! 2. Flat weight-lifting entry: `{"timestamp": t, "exercise": .., ..}`.
//! 3. Flat running entry: `{"timestamp": t, "distance_miles": .., ..}`.
//!
//! An activity only counts when at least one of its non-key fields is
//! non-zero or non-empty. A `null` field reads as zero/empty.

use crate::error::DecodeError;
use crate::models::workout::null_as_default;
use crate::models::{RunningEntry, Timestamp, WeightLiftingEntry, Workout};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "null_as_default")]
    timestamp: Timestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    date: Timestamp,
    #[serde(default)]
    weight_lifting: Option<WeightLiftingEntry>,
    #[serde(default)]
    running: Option<RunningEntry>,
}

/// Decode a workout submission.
pub fn decode_workout(raw: &[u8]) -> Result<Workout, DecodeError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::Malformed("expected a JSON object".to_string()));
    }

    let workout = from_envelope(&value)
        .or_else(|| from_flat_lifting(&value))
        .or_else(|| from_flat_running(&value))
        .ok_or(DecodeError::InvalidPayload)?;

    tracing::debug!(
        timestamp = workout.timestamp,
        weight_lifting = workout.weight_lifting.is_some(),
        running = workout.running.is_some(),
        "Decoded workout payload"
    );

    Ok(workout)
}

/// Decode a bare timestamp literal such as `1718236800`.
pub fn decode_timestamp(raw: &[u8]) -> Result<Timestamp, DecodeError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| DecodeError::InvalidTimestamp("not valid UTF-8".to_string()))?
        .trim();

    match text.parse::<Timestamp>() {
        Ok(0) => Err(DecodeError::InvalidTimestamp("zero is not a valid key".to_string())),
        Ok(timestamp) => Ok(timestamp),
        Err(e) => Err(DecodeError::InvalidTimestamp(format!("{:?}: {}", text, e))),
    }
}

fn from_envelope(value: &Value) -> Option<Workout> {
    // A type mismatch here is not fatal; the flat layouts get their turn.
    let envelope = Envelope::deserialize(value).ok()?;

    let weight_lifting = envelope.weight_lifting.filter(WeightLiftingEntry::is_entered);
    let running = envelope.running.filter(RunningEntry::is_entered);
    if weight_lifting.is_none() && running.is_none() {
        return None;
    }

    let timestamp = [
        Some(envelope.timestamp),
        Some(envelope.date),
        weight_lifting.as_ref().map(|w| w.timestamp),
        running.as_ref().map(|r| r.timestamp),
    ]
    .into_iter()
    .flatten()
    .find(|t| *t != 0)?;

    let weight_lifting = weight_lifting.map(|mut w| {
        if w.timestamp == 0 {
            w.timestamp = timestamp;
        }
        w
    });
    let running = running.map(|mut r| {
        if r.timestamp == 0 {
            r.timestamp = timestamp;
        }
        r
    });

    Some(Workout {
        timestamp,
        weight_lifting,
        running,
    })
}

fn from_flat_lifting(value: &Value) -> Option<Workout> {
    let entry = WeightLiftingEntry::deserialize(value).ok()?;
    (entry.timestamp != 0 && entry.is_entered()).then(|| Workout {
        timestamp: entry.timestamp,
        weight_lifting: Some(entry),
        running: None,
    })
}

fn from_flat_running(value: &Value) -> Option<Workout> {
    let entry = RunningEntry::deserialize(value).ok()?;
    (entry.timestamp != 0 && entry.is_entered()).then(|| Workout {
        timestamp: entry.timestamp,
        weight_lifting: None,
        running: Some(entry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squat(timestamp: Timestamp) -> WeightLiftingEntry {
        WeightLiftingEntry {
            timestamp,
            exercise: "squat".to_string(),
            weight_lbs: 200,
            total_sets: 3,
        }
    }

    #[test]
    fn test_envelope_with_lifting_only() {
        let raw = br#"{"timestamp": 5, "weight_lifting": {"exercise":"squat","weight_lbs":200,"total_sets":3}}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 5);
        assert_eq!(workout.weight_lifting, Some(squat(5)));
        assert_eq!(workout.running, None);
    }

    #[test]
    fn test_envelope_with_both_activities() {
        let raw = br#"{
            "timestamp": 1700000000,
            "weight_lifting": {"exercise": "deadlift", "weight_lbs": 315, "total_sets": 2},
            "running": {"distance_miles": 5.0, "elapsed_secs": 2400, "speed_mph": 7.5, "incline_deg": 1.0}
        }"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 1700000000);
        let lifting = workout.weight_lifting.unwrap();
        assert_eq!(lifting.timestamp, 1700000000);
        assert_eq!(lifting.exercise, "deadlift");
        let running = workout.running.unwrap();
        assert_eq!(running.timestamp, 1700000000);
        assert_eq!(running.elapsed_secs, 2400.0);
    }

    #[test]
    fn test_envelope_accepts_date_key_and_null_entries() {
        // Shape sent by the web client
        let raw = br#"{"date": 12, "weight_lifting": null, "running": {"distance_miles": 1.5}}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 12);
        assert!(workout.weight_lifting.is_none());
        assert_eq!(workout.running.unwrap().distance_miles, 1.5);
    }

    #[test]
    fn test_envelope_with_timestamp_and_date() {
        let raw = br#"{"timestamp": 5, "date": 5, "weight_lifting": {"exercise": "squat"}}"#;
        let workout = decode_workout(raw).unwrap();
        assert_eq!(workout.timestamp, 5);

        // `timestamp` wins when both are set
        let raw = br#"{"timestamp": 5, "date": 6, "weight_lifting": {"exercise": "squat"}}"#;
        let workout = decode_workout(raw).unwrap();
        assert_eq!(workout.timestamp, 5);

        let raw = br#"{"timestamp": 0, "date": 6, "weight_lifting": {"exercise": "squat"}}"#;
        let workout = decode_workout(raw).unwrap();
        assert_eq!(workout.timestamp, 6);
    }

    #[test]
    fn test_null_envelope_timestamp_resolves_from_entry() {
        let raw = br#"{"timestamp": null, "weight_lifting": {"timestamp": 4, "exercise": "squat"}}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 4);
        assert_eq!(workout.weight_lifting.unwrap().exercise, "squat");
    }

    #[test]
    fn test_null_entry_fields_read_as_empty() {
        let raw = br#"{"timestamp": 5, "weight_lifting": {"exercise": null, "weight_lbs": 100}}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(
            workout.weight_lifting,
            Some(WeightLiftingEntry {
                timestamp: 5,
                exercise: String::new(),
                weight_lbs: 100,
                total_sets: 0,
            })
        );

        // All-null entry is not entered
        let raw = br#"{"timestamp": 5, "weight_lifting": {"exercise": null}, "running": {"speed_mph": null, "distance_miles": 2.0}}"#;
        let workout = decode_workout(raw).unwrap();
        assert!(workout.weight_lifting.is_none());
        assert_eq!(workout.running.unwrap().distance_miles, 2.0);
    }

    #[test]
    fn test_flat_shape_with_nulls() {
        let raw = br#"{"timestamp": 7, "distance_miles": 3.1, "elapsed_secs": null, "speed_mph": null, "incline_deg": null}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.running.unwrap().distance_miles, 3.1);
    }

    #[test]
    fn test_envelope_all_default_entry_is_absent() {
        let raw = br#"{"timestamp": 5, "weight_lifting": {"exercise":"","weight_lbs":0,"total_sets":0}, "running": {"speed_mph": 6.0}}"#;

        let workout = decode_workout(raw).unwrap();

        assert!(workout.weight_lifting.is_none());
        assert!(workout.running.is_some());
    }

    #[test]
    fn test_envelope_timestamp_falls_back_to_entries() {
        let raw = br#"{"weight_lifting": {"timestamp": 44, "exercise": "row"}, "running": {"timestamp": 55, "distance_miles": 1.0}}"#;

        let workout = decode_workout(raw).unwrap();
        assert_eq!(workout.timestamp, 44);

        let raw = br#"{"running": {"timestamp": 55, "distance_miles": 1.0}}"#;
        let workout = decode_workout(raw).unwrap();
        assert_eq!(workout.timestamp, 55);
    }

    #[test]
    fn test_envelope_keeps_explicit_entry_timestamp() {
        let raw = br#"{"timestamp": 5, "weight_lifting": {"timestamp": 6, "exercise": "curl"}}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 5);
        assert_eq!(workout.weight_lifting.unwrap().timestamp, 6);
    }

    #[test]
    fn test_flat_running_shape() {
        let raw = br#"{"timestamp": 7, "distance_miles": 3.1, "elapsed_secs": 1500, "speed_mph": 7.4, "incline_deg": 0}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(
            workout,
            Workout {
                timestamp: 7,
                weight_lifting: None,
                running: Some(RunningEntry {
                    timestamp: 7,
                    distance_miles: 3.1,
                    elapsed_secs: 1500.0,
                    speed_mph: 7.4,
                    incline_deg: 0.0,
                }),
            }
        );
    }

    #[test]
    fn test_flat_lifting_shape() {
        let raw = br#"{"timestamp": 8, "exercise": "squat", "weight_lbs": 200, "total_sets": 3}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 8);
        assert_eq!(workout.weight_lifting, Some(squat(8)));
        assert!(workout.running.is_none());
    }

    #[test]
    fn test_envelope_type_mismatch_falls_through() {
        // `running` is not an object, so the envelope layout does not apply
        let raw = br#"{"timestamp": 9, "running": "fast", "exercise": "press", "weight_lbs": 95}"#;

        let workout = decode_workout(raw).unwrap();

        assert_eq!(workout.timestamp, 9);
        assert_eq!(workout.weight_lifting.unwrap().exercise, "press");
    }

    #[test]
    fn test_flat_shape_requires_timestamp() {
        let raw = br#"{"distance_miles": 3.1}"#;
        assert!(matches!(
            decode_workout(raw),
            Err(DecodeError::InvalidPayload)
        ));
    }

    #[test]
    fn test_empty_payloads_rejected() {
        let cases: [&[u8]; 3] = [br#"{"timestamp": 0}"#, b"{}", br#"{"timestamp": 3}"#];
        for raw in cases {
            assert!(matches!(
                decode_workout(raw),
                Err(DecodeError::InvalidPayload)
            ));
        }
    }

    #[test]
    fn test_zero_key_everywhere_rejected() {
        let raw = br#"{"timestamp": 0, "weight_lifting": {"exercise": "squat"}}"#;
        assert!(matches!(
            decode_workout(raw),
            Err(DecodeError::InvalidPayload)
        ));
    }

    #[test]
    fn test_malformed_payloads() {
        let cases: [&[u8]; 5] = [b"{not json", b"", b"[1, 2]", b"42", b"\xff\xfe"];
        for raw in cases {
            assert!(matches!(
                decode_workout(raw),
                Err(DecodeError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_decode_is_repeatable() {
        let raw = br#"{"timestamp": 5, "weight_lifting": {"exercise":"squat","weight_lbs":200,"total_sets":3}, "running": {"distance_miles": 2.0}}"#;
        assert_eq!(decode_workout(raw).unwrap(), decode_workout(raw).unwrap());
    }

    #[test]
    fn test_decode_timestamp() {
        assert_eq!(decode_timestamp(b"1718236800").unwrap(), 1718236800);
        assert_eq!(decode_timestamp(b"  42\n").unwrap(), 42);
    }

    #[test]
    fn test_decode_timestamp_rejects_garbage() {
        let cases: [&[u8]; 7] = [b"", b"0", b"-1", b"1.5", b"\"12\"", b"12abc", b"\xff"];
        for raw in cases {
            assert!(
                matches!(decode_timestamp(raw), Err(DecodeError::InvalidTimestamp(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }
}
