//! Time-slot generation.
//!
//! Cuts one day's work window into focus-sized slots separated by breaks and
//! tags each slot with the energy level of its starting hour. Slots are
//! regenerated on every scheduling run and never merged or split afterwards.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::energy::EnergyLevel;
use crate::pattern::ProductivityPattern;

/// A contiguous stretch of work time on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: u32,
    pub energy_level: EnergyLevel,
}

impl TimeSlot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, energy_level: EnergyLevel) -> Self {
        let duration_minutes = (end - start).num_minutes().max(0) as u32;
        Self {
            start,
            end,
            duration_minutes,
            energy_level,
        }
    }

    /// Hour of day the slot starts in.
    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Generate the slots of `date` for `pattern`.
///
/// Walks from the pattern's work start to its work end. Each slot lasts
/// `focus_duration` minutes, capped to the time left, and is followed by a
/// `break_duration` gap. The walk stops once the remaining window is shorter
/// than `min_block_minutes`. A slot that would overlap one of the pattern's
/// break windows is not emitted; the walk resumes at the end of that window.
pub fn generate_time_slots(
    date: NaiveDate,
    pattern: &ProductivityPattern,
    min_block_minutes: u32,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if pattern.focus_duration == 0 || pattern.work_end <= pattern.work_start {
        return slots;
    }

    let work_end = date.and_time(pattern.work_end);
    let mut cursor = date.and_time(pattern.work_start);
    let min_block = min_block_minutes.max(1) as i64;

    while cursor < work_end {
        let remaining = (work_end - cursor).num_minutes();
        let length = (pattern.focus_duration as i64).min(remaining);
        if length < min_block {
            break;
        }
        let slot_end = cursor + Duration::minutes(length);

        if let Some(window) = pattern
            .break_windows
            .iter()
            .filter(|w| w.overlaps(cursor.time(), slot_end.time()))
            .max_by_key(|w| w.end)
        {
            let resume = date.and_time(window.end);
            if resume <= cursor {
                break;
            }
            cursor = resume;
            continue;
        }

        let energy = pattern.energy.level_at(cursor.hour());
        slots.push(TimeSlot::new(cursor, slot_end, energy));

        cursor = slot_end + Duration::minutes(pattern.break_duration as i64);
    }

    slots
}
