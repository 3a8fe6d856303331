//! Schedule blocks and daily schedules.
//!
//! A [`DailySchedule`] is the aggregate the scheduler hands back for one
//! calendar date: the ordered blocks plus totals and two heuristic scores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::slots::TimeSlot;
use crate::task::Task;

/// Block length at which the duration part of the flexibility score bottoms
/// out. Independent of the configured block cap.
pub const FLEXIBILITY_SCALE_MINUTES: u32 = 180;

/// A task placed into a time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub block_id: String,
    pub task: Task,
    pub slot: TimeSlot,
    /// Expected share of the slot turned into useful work, 0.3 to 1.0
    pub estimated_efficiency: f64,
    /// Whether the slot's effective time is estimated to cover all of the
    /// task's remaining work. An estimate only; task state is not updated.
    pub covers_remaining: bool,
    /// Break minutes before this block
    pub break_before: u32,
    /// Break minutes after this block
    pub break_after: u32,
}

impl ScheduleBlock {
    pub fn new(index: usize, task: Task, slot: TimeSlot, estimated_efficiency: f64) -> Self {
        let block_id = format!("block_{:03}_{}", index, slot.start.and_utc().timestamp());
        let covers_remaining = effective_minutes(slot.duration_minutes, estimated_efficiency)
            >= task.remaining_duration();
        Self {
            block_id,
            task,
            slot,
            estimated_efficiency,
            covers_remaining,
            break_before: 0,
            break_after: 0,
        }
    }

    pub fn with_breaks(mut self, before: u32, after: u32) -> Self {
        self.break_before = before;
        self.break_after = after;
        self
    }

    /// Minutes of useful work expected from this block.
    pub fn effective_duration(&self) -> u32 {
        effective_minutes(self.slot.duration_minutes, self.estimated_efficiency)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.slot.duration_minutes
    }
}

fn effective_minutes(duration: u32, efficiency: f64) -> u32 {
    (duration as f64 * efficiency).floor() as u32
}

/// The schedule for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub blocks: Vec<ScheduleBlock>,
    /// Sum of slot durations, minutes
    pub total_work_time: u32,
    /// Sum of breaks around blocks, minutes
    pub total_break_time: u32,
    /// Mean block efficiency
    pub efficiency_score: f64,
    /// How easily the day could be rearranged, 0.5 to 1.0
    pub flexibility_score: f64,
}

impl DailySchedule {
    /// Aggregate `blocks` into a schedule. Returns `None` for an empty day.
    pub fn assemble(date: NaiveDate, blocks: Vec<ScheduleBlock>) -> Option<Self> {
        if blocks.is_empty() {
            return None;
        }

        let total_work_time = blocks.iter().map(|b| b.slot.duration_minutes).sum();
        let total_break_time = blocks.iter().map(|b| b.break_before + b.break_after).sum();
        let efficiency_score =
            blocks.iter().map(|b| b.estimated_efficiency).sum::<f64>() / blocks.len() as f64;
        let flexibility_score = flexibility(&blocks);

        Some(Self {
            date,
            blocks,
            total_work_time,
            total_break_time,
            efficiency_score,
            flexibility_score,
        })
    }

    /// ISO `YYYY-MM-DD` key of this schedule.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Break minutes per work minute, 0 for an empty day.
    pub fn break_ratio(&self) -> f64 {
        if self.total_work_time == 0 {
            0.0
        } else {
            self.total_break_time as f64 / self.total_work_time as f64
        }
    }

    pub fn total_effective_time(&self) -> u32 {
        self.blocks.iter().map(ScheduleBlock::effective_duration).sum()
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.task.id.as_str())
    }
}

/// Mean of two factors per block: interruptibility (1.0 or 0.5) and
/// shortness (`max(0.5, 1 - duration / 180)`).
pub fn flexibility(blocks: &[ScheduleBlock]) -> f64 {
    if blocks.is_empty() {
        return 0.0;
    }
    let scale = FLEXIBILITY_SCALE_MINUTES as f64;
    let sum: f64 = blocks
        .iter()
        .map(|b| {
            let interrupt = if b.task.can_be_interrupted { 1.0 } else { 0.5 };
            let shortness = (1.0 - b.slot.duration_minutes as f64 / scale).max(0.5);
            interrupt + shortness
        })
        .sum();
    sum / (blocks.len() * 2) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyLevel;
    use chrono::Duration;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn slot(hour: u32, minutes: i64) -> TimeSlot {
        let start = date().and_hms_opt(hour, 0, 0).unwrap();
        TimeSlot::new(start, start + Duration::minutes(minutes), EnergyLevel::High)
    }

    #[test]
    fn block_id_encodes_index_and_start() {
        let block = ScheduleBlock::new(2, Task::new("t", "x"), slot(9, 90), 1.0);
        let ts = date().and_hms_opt(9, 0, 0).unwrap().and_utc().timestamp();
        assert_eq!(block.block_id, format!("block_002_{ts}"));
    }

    #[test]
    fn effective_duration_scales_by_efficiency() {
        let block = ScheduleBlock::new(0, Task::new("t", "x"), slot(9, 90), 0.75);
        assert_eq!(block.effective_duration(), 67);
    }

    #[test]
    fn covers_remaining_compares_effective_time() {
        let task = Task::new("t", "x").with_duration(90);
        assert!(ScheduleBlock::new(0, task.clone(), slot(9, 90), 1.0).covers_remaining);
        assert!(!ScheduleBlock::new(0, task, slot(9, 90), 0.9).covers_remaining);
    }

    #[test]
    fn empty_day_has_no_schedule() {
        assert!(DailySchedule::assemble(date(), Vec::new()).is_none());
    }

    #[test]
    fn totals_and_scores() {
        let blocks = vec![
            ScheduleBlock::new(0, Task::new("a", "a"), slot(9, 90), 1.0),
            ScheduleBlock::new(1, Task::new("b", "b").interruptible(true), slot(11, 60), 0.6)
                .with_breaks(15, 0),
        ];
        let schedule = DailySchedule::assemble(date(), blocks).unwrap();
        assert_eq!(schedule.total_work_time, 150);
        assert_eq!(schedule.blocks[1].duration_minutes(), 60);
        assert_eq!(schedule.total_effective_time(), 90 + 36);
        assert_eq!(schedule.total_break_time, 15);
        assert!((schedule.efficiency_score - 0.8).abs() < 1e-9);
        // (0.5 + 0.5 + 1.0 + 2/3) / 4
        assert!((schedule.flexibility_score - (2.0 + 2.0 / 3.0) / 4.0).abs() < 1e-9);
        assert!((schedule.break_ratio() - 0.1).abs() < 1e-9);
        assert_eq!(schedule.date_key(), "2026-03-02");
        assert_eq!(schedule.task_ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn long_blocks_floor_shortness_at_half() {
        let blocks = vec![ScheduleBlock::new(0, Task::new("a", "a"), slot(9, 240), 1.0)];
        assert!((flexibility(&blocks) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn shortness_uses_fixed_scale() {
        // 90 of 180 minutes: interrupt 0.5, shortness 0.5
        let rigid = vec![ScheduleBlock::new(0, Task::new("a", "a"), slot(9, 90), 1.0)];
        assert!((flexibility(&rigid) - 0.5).abs() < 1e-9);
        // 45 of 180 minutes: interrupt 1.0, shortness 0.75
        let loose = vec![ScheduleBlock::new(
            0,
            Task::new("a", "a").interruptible(true),
            slot(9, 45),
            1.0,
        )];
        assert!((flexibility(&loose) - 0.875).abs() < 1e-9);
    }
}
