//! # Slot Grid
//!
//! The room is bookable on a fixed grid of time labels. The default grid runs
//! from 09:00 to 21:00 in 30-minute steps, which gives 25 labels and 24
//! consecutive bookable slots.

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        room::RoomStore,
        time_slot::{SlotTime, TimeSlot},
    },
};

pub const DEFAULT_OPENING: (u32, u32) = (9, 0);
pub const DEFAULT_CLOSING: (u32, u32) = (21, 0);
pub const DEFAULT_STEP_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    opening: SlotTime,
    closing: SlotTime,
    step_minutes: u32,
}

impl Default for SlotGrid {
    fn default() -> Self {
        let opening = SlotTime::from_hm(DEFAULT_OPENING.0, DEFAULT_OPENING.1)
            .unwrap_or_else(|| unreachable!("default opening time is valid"));
        let closing = SlotTime::from_hm(DEFAULT_CLOSING.0, DEFAULT_CLOSING.1)
            .unwrap_or_else(|| unreachable!("default closing time is valid"));

        Self {
            opening,
            closing,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

impl SlotGrid {
    pub fn new(opening: SlotTime, closing: SlotTime, step_minutes: u32) -> BookingResult<Self> {
        if step_minutes == 0 {
            return Err(BookingError::validation("Slot duration must be positive"));
        }
        if opening >= closing {
            return Err(BookingError::validation(format!(
                "Opening time {opening} must be before closing time {closing}"
            )));
        }

        Ok(Self {
            opening,
            closing,
            step_minutes,
        })
    }

    /// Grid described by a store's opening hours and slot duration.
    pub fn from_store(store: &RoomStore) -> BookingResult<Self> {
        let step = u32::try_from(store.time_slot_duration).map_err(|_| {
            BookingError::validation(format!(
                "Invalid slot duration {} for store {}",
                store.time_slot_duration, store.id
            ))
        })?;

        Self::new(store.opening_hours.start, store.opening_hours.end, step)
    }

    pub fn opening(&self) -> SlotTime {
        self.opening
    }

    pub fn closing(&self) -> SlotTime {
        self.closing
    }

    /// Every label from opening through closing, inclusive, in grid order.
    pub fn time_options(&self) -> Vec<SlotTime> {
        self.labels_from(self.opening.minutes_since_midnight())
    }

    /// Whether `time` falls on a grid step within opening hours.
    pub fn contains(&self, time: SlotTime) -> bool {
        let open = self.opening.minutes_since_midnight();
        let minutes = time.minutes_since_midnight();
        (open..=self.closing.minutes_since_midnight()).contains(&minutes)
            && (minutes - open) % self.step_minutes == 0
    }

    /// Labels strictly after `start`. Empty when `start` is not on the grid.
    pub fn valid_end_times(&self, start: SlotTime) -> Vec<SlotTime> {
        if !self.contains(start) {
            return Vec::new();
        }
        self.labels_from(start.minutes_since_midnight() + self.step_minutes)
    }

    /// Consecutive single-step slots covering the opening hours.
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.time_options()
            .windows(2)
            .map(|pair| TimeSlot {
                start_time: pair[0],
                end_time: pair[1],
                available: true,
            })
            .collect()
    }

    /// Whether `[start, end)` is a slot a customer may book on this grid.
    pub fn is_bookable(&self, start: SlotTime, end: SlotTime) -> bool {
        start < end && self.contains(start) && self.contains(end)
    }

    fn labels_from(&self, first_minute: u32) -> Vec<SlotTime> {
        (first_minute..=self.closing.minutes_since_midnight())
            .step_by(self.step_minutes as usize)
            .filter_map(SlotTime::from_minutes)
            .collect()
    }
}

/// Time labels of the default grid.
pub fn generate_time_options() -> Vec<SlotTime> {
    SlotGrid::default().time_options()
}

/// End-time choices on the default grid for an optional start selection.
pub fn valid_end_times(start: Option<SlotTime>) -> Vec<SlotTime> {
    start
        .map(|start| SlotGrid::default().valid_end_times(start))
        .unwrap_or_default()
}
