// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout records for storage and API.
//!
//! All three collections share the `timestamp` field as their join key.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Day/instant key joining all workout data. Zero is never a valid key.
pub type Timestamp = u64;

/// Deserialize a JSON `null` as the field's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Registered day, stored in the `timestamps` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRecord {
    /// Timestamp (also used as document ID)
    pub timestamp: Timestamp,
}

/// Weight-lifting data for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(default)]
pub struct WeightLiftingEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: Timestamp,
    /// Exercise name (may be empty)
    #[serde(deserialize_with = "null_as_default")]
    pub exercise: String,
    #[serde(deserialize_with = "null_as_default")]
    pub weight_lbs: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_sets: u32,
}

impl WeightLiftingEntry {
    /// True when at least one non-key field carries a non-default value.
    pub fn is_entered(&self) -> bool {
        !self.exercise.is_empty() || self.weight_lbs != 0 || self.total_sets != 0
    }
}

/// Running data for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(default)]
pub struct RunningEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: Timestamp,
    #[serde(deserialize_with = "null_as_default")]
    pub distance_miles: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub elapsed_secs: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub speed_mph: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub incline_deg: f64,
}

impl RunningEntry {
    /// True when at least one non-key field carries a non-default value.
    pub fn is_entered(&self) -> bool {
        self.distance_miles != 0.0
            || self.elapsed_secs != 0.0
            || self.speed_mph != 0.0
            || self.incline_deg != 0.0
    }
}

/// One day's activities. `None` means the activity was not logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workout {
    pub timestamp: Timestamp,
    pub weight_lifting: Option<WeightLiftingEntry>,
    pub running: Option<RunningEntry>,
}

impl Workout {
    /// Force every entry's `timestamp` to the workout key.
    pub fn stamped(mut self) -> Self {
        let timestamp = self.timestamp;
        if let Some(lifting) = self.weight_lifting.as_mut() {
            lifting.timestamp = timestamp;
        }
        if let Some(running) = self.running.as_mut() {
            running.timestamp = timestamp;
        }
        self
    }
}
