use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{BookingError, BookingResult};

/// A wall-clock time label such as `09:30`.
///
/// Labels display as `HH:MM`. Parsing also accepts `HH:MM:SS`, which is how
/// `TIME` columns come back from the relational store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(SlotTime)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::from_hm(minutes / 60, minutes % 60)
    }
}

impl From<NaiveTime> for SlotTime {
    fn from(time: NaiveTime) -> Self {
        SlotTime(time)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(SlotTime)
            .map_err(|_| BookingError::validation(format!("Invalid time label: {s:?}")))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// share at least one instant. Touching endpoints do not overlap.
pub fn overlaps(a_start: SlotTime, a_end: SlotTime, b_start: SlotTime, b_end: SlotTime) -> bool {
    a_start < b_end && a_end > b_start
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    /// Transient display flag; never persisted.
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl TimeSlot {
    pub fn new(start_time: SlotTime, end_time: SlotTime) -> BookingResult<Self> {
        if start_time >= end_time {
            return Err(BookingError::validation(format!(
                "Start time {start_time} must be before end time {end_time}"
            )));
        }

        Ok(Self {
            start_time,
            end_time,
            available: true,
        })
    }

    pub fn overlaps(&self, start: SlotTime, end: SlotTime) -> bool {
        overlaps(self.start_time, self.end_time, start, end)
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(label: &str) -> SlotTime {
        label.parse().unwrap()
    }

    #[test]
    fn parses_store_time_with_seconds() {
        assert_eq!(t("10:00:00"), t("10:00"));
        assert_eq!(t("10:00:00").to_string(), "10:00");
    }

    #[test]
    fn rejects_garbage_labels() {
        assert!("25:00".parse::<SlotTime>().is_err());
        assert!("ten".parse::<SlotTime>().is_err());
    }

    #[test]
    fn time_slot_requires_start_before_end() {
        assert!(TimeSlot::new(t("10:00"), t("10:00")).is_err());
        assert!(TimeSlot::new(t("11:00"), t("10:00")).is_err());
        assert!(TimeSlot::new(t("10:00"), t("10:30")).is_ok());
    }
}
