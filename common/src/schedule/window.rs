// Operating window and lunch break every session must respect

use crate::errors::ValidationError;
use crate::models::{deserialize_hhmm, serialize_hhmm, SessionSlot};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Daily bounds for sessions.
///
/// Intervals are half-open, so a session ending exactly when lunch starts
/// does not overlap it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingWindow {
    #[serde(serialize_with = "serialize_hhmm", deserialize_with = "deserialize_hhmm")]
    pub day_start: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm", deserialize_with = "deserialize_hhmm")]
    pub day_end: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm", deserialize_with = "deserialize_hhmm")]
    pub lunch_start: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm", deserialize_with = "deserialize_hhmm")]
    pub lunch_end: NaiveTime,
}

impl Default for SchedulingWindow {
    fn default() -> Self {
        Self {
            day_start: hm(7, 0),
            day_end: hm(22, 0),
            lunch_start: hm(12, 0),
            lunch_end: hm(13, 0),
        }
    }
}

impl SchedulingWindow {
    /// Whether `[start, end)` intersects the lunch break.
    pub fn overlaps_lunch(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.lunch_end && self.lunch_start < end
    }

    /// Check a session against the window.
    pub fn admits(&self, slot: &SessionSlot) -> Result<(), ValidationError> {
        if slot.end_time <= slot.start_time {
            return Err(ValidationError::InvalidFieldValue {
                field: "horaFin".to_string(),
                reason: format!(
                    "{} is not after {}",
                    fmt(slot.end_time),
                    fmt(slot.start_time)
                ),
            });
        }

        if slot.start_time < self.day_start || slot.end_time > self.day_end {
            return Err(ValidationError::OutsideWindow {
                start: fmt(slot.start_time),
                end: fmt(slot.end_time),
                window_start: fmt(self.day_start),
                window_end: fmt(self.day_end),
            });
        }

        if self.overlaps_lunch(slot.start_time, slot.end_time) {
            return Err(ValidationError::OverlapsLunch {
                start: fmt(slot.start_time),
                end: fmt(slot.end_time),
                lunch_start: fmt(self.lunch_start),
                lunch_end: fmt(self.lunch_end),
            });
        }

        Ok(())
    }
}

/// Build a wall-clock time from literal hour and minute values.
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn fmt(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
