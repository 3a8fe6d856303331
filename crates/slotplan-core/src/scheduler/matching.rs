//! Slot/task compatibility scoring and efficiency estimation.
//!
//! The match score decides which task a slot gets; the efficiency estimate
//! says how much of the slot's time is expected to turn into useful work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::energy::EnergyLevel;
use crate::pattern::ProductivityPattern;
use crate::slots::TimeSlot;
use crate::task::Task;

/// Lower bound of an efficiency estimate.
pub const MIN_EFFICIENCY: f64 = 0.3;
/// Upper bound of an efficiency estimate.
pub const MAX_EFFICIENCY: f64 = 1.0;

/// Breakdown of a slot/task match score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchScore {
    /// Energy alignment: graded by slot energy for deep-focus tasks, flat 1.0 otherwise
    pub energy: f64,
    /// Task-type preference multiplier
    pub preference: f64,
    /// 1.0 when the slot falls in the task's preferred period
    pub time_of_day: f64,
    /// 0.3 x urgency
    pub urgency: f64,
    /// 0.5 x share of the slot the task can fill
    pub duration_fit: f64,
}

impl MatchScore {
    pub fn total(&self) -> f64 {
        self.energy + self.preference + self.time_of_day + self.urgency + self.duration_fit
    }
}

/// Score how well `task` fits `slot`.
pub fn match_score(
    task: &Task,
    slot: &TimeSlot,
    pattern: &ProductivityPattern,
    now: DateTime<Utc>,
) -> MatchScore {
    let energy = if task.requires_deep_focus {
        slot.energy_level.deep_focus_bonus()
    } else {
        1.0
    };

    let time_of_day = match task.preferred_time_of_day {
        Some(period) if period.matches_hour(slot.start_hour()) => 1.0,
        _ => 0.0,
    };

    let duration_fit = if slot.duration_minutes == 0 {
        0.0
    } else {
        let filled = task.remaining_duration().min(slot.duration_minutes) as f64;
        0.5 * filled / slot.duration_minutes as f64
    };

    MatchScore {
        energy,
        preference: pattern.task_preferences.multiplier(task.task_type),
        time_of_day,
        urgency: 0.3 * task.urgency_score_at(now),
        duration_fit,
    }
}

/// Estimate how efficiently `task` would be worked on in `slot`, in
/// `[MIN_EFFICIENCY, MAX_EFFICIENCY]`.
pub fn estimate_efficiency(task: &Task, slot: &TimeSlot, pattern: &ProductivityPattern) -> f64 {
    let mut efficiency = 1.0;

    efficiency *= slot.energy_level.efficiency_multiplier();
    efficiency *= pattern.task_preferences.multiplier(task.task_type);

    // Slots barely longer than the ramp-up time lose a share of it
    let context = pattern.context_building_time;
    if slot.duration_minutes > 0 && slot.duration_minutes < context * 2 {
        let penalty = context as f64 / slot.duration_minutes as f64;
        efficiency *= (1.0 - penalty).max(0.5);
    }

    if task.requires_deep_focus {
        match slot.energy_level {
            EnergyLevel::Peak | EnergyLevel::High => efficiency *= 1.1,
            EnergyLevel::Low => efficiency *= 0.7,
            EnergyLevel::Medium => {}
        }
    }

    efficiency.clamp(MIN_EFFICIENCY, MAX_EFFICIENCY)
}

/// Pick the best task for `slot` from `ranked`.
///
/// Skips tasks already `placed` today, completed tasks and tasks with less
/// than `min_block_minutes` of work left. The first of equally scored tasks
/// wins, so the ranking order acts as the tie-breaker.
pub fn best_task_for_slot<'a>(
    slot: &TimeSlot,
    ranked: &[&'a Task],
    placed: &HashSet<&str>,
    pattern: &ProductivityPattern,
    now: DateTime<Utc>,
    min_block_minutes: u32,
) -> Option<(&'a Task, MatchScore)> {
    let mut best: Option<(&'a Task, MatchScore)> = None;

    for &task in ranked {
        if placed.contains(task.id.as_str())
            || task.is_completed()
            || task.remaining_duration() < min_block_minutes
        {
            continue;
        }

        let score = match_score(task, slot, pattern, now);
        let better = match &best {
            Some((_, current)) => score.total() > current.total(),
            None => true,
        };
        if better {
            best = Some((task, score));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyCurve;
    use crate::pattern::TaskPreferences;
    use crate::task::{TaskPriority, TaskType, TimeOfDay};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap()
    }

    fn slot(hour: u32, minutes: i64, level: EnergyLevel) -> TimeSlot {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TimeSlot::new(start, start + chrono::Duration::minutes(minutes), level)
    }

    fn neutral_pattern() -> ProductivityPattern {
        ProductivityPattern::new("u1")
            .with_energy(EnergyCurve::new())
            .with_task_preferences(TaskPreferences::neutral())
    }

    #[test]
    fn deep_focus_prefers_high_energy() {
        let task = Task::new("t", "x");
        let p = neutral_pattern();
        let peak = match_score(&task, &slot(10, 90, EnergyLevel::Peak), &p, now());
        let low = match_score(&task, &slot(10, 90, EnergyLevel::Low), &p, now());
        assert_eq!(peak.energy, 2.0);
        assert_eq!(low.energy, 0.3);
        assert!(peak.total() > low.total());
    }

    #[test]
    fn shallow_task_gets_flat_energy_bonus() {
        let task = Task::new("t", "x").with_deep_focus(false);
        let score = match_score(&task, &slot(10, 90, EnergyLevel::Low), &neutral_pattern(), now());
        assert_eq!(score.energy, 1.0);
    }

    #[test]
    fn score_terms_add_up() {
        let task = Task::new("t", "x")
            .with_priority(TaskPriority::High)
            .with_duration(45)
            .with_preferred_time(TimeOfDay::Morning);
        let score = match_score(&task, &slot(9, 90, EnergyLevel::High), &neutral_pattern(), now());
        assert_eq!(score.energy, 1.5);
        assert_eq!(score.preference, 1.0);
        assert_eq!(score.time_of_day, 1.0);
        assert!((score.urgency - 1.2).abs() < 1e-9);
        assert!((score.duration_fit - 0.25).abs() < 1e-9);
        assert!((score.total() - 4.95).abs() < 1e-9);
    }

    #[test]
    fn afternoon_preference_ignored_in_morning() {
        let task = Task::new("t", "x").with_preferred_time(TimeOfDay::Afternoon);
        let score = match_score(&task, &slot(9, 90, EnergyLevel::High), &neutral_pattern(), now());
        assert_eq!(score.time_of_day, 0.0);
    }

    #[test]
    fn efficiency_follows_energy_and_type() {
        let p = ProductivityPattern::new("u1");
        let shallow = Task::new("t", "x").with_deep_focus(false).with_type(TaskType::Reading);
        let eff = estimate_efficiency(&shallow, &slot(14, 90, EnergyLevel::Medium), &p);
        assert!((eff - 0.64).abs() < 1e-9);

        let deep = Task::new("t", "x").with_type(TaskType::Research);
        let eff = estimate_efficiency(&deep, &slot(9, 90, EnergyLevel::High), &p);
        assert_eq!(eff, 1.0);
    }

    #[test]
    fn efficiency_is_clamped() {
        let p = ProductivityPattern::new("u1");
        let admin = Task::new("t", "x").with_type(TaskType::Admin);
        // 0.6 * 0.6 * 0.7 = 0.252
        let eff = estimate_efficiency(&admin, &slot(13, 90, EnergyLevel::Low), &p);
        assert_eq!(eff, MIN_EFFICIENCY);

        let analysis = Task::new("t", "x").with_type(TaskType::Analysis);
        let eff = estimate_efficiency(&analysis, &slot(10, 90, EnergyLevel::Peak), &p);
        assert_eq!(eff, MAX_EFFICIENCY);
    }

    #[test]
    fn short_slot_pays_context_penalty() {
        let p = neutral_pattern().with_context_building_time(20);
        let task = Task::new("t", "x").with_deep_focus(false);
        // 30 < 2 * 20: 1.0 * max(0.5, 1 - 20/30)
        let eff = estimate_efficiency(&task, &slot(9, 30, EnergyLevel::High), &p);
        assert!((eff - 0.5).abs() < 1e-9);
    }

    #[test]
    fn best_task_skips_placed_and_small_tasks() {
        let p = neutral_pattern();
        let a = Task::new("a", "a").with_priority(TaskPriority::Critical);
        let b = Task::new("b", "b").with_duration(20);
        let c = Task::new("c", "c").with_priority(TaskPriority::Low);
        let ranked = vec![&a, &b, &c];

        let s = slot(9, 90, EnergyLevel::High);
        let (picked, _) = best_task_for_slot(&s, &ranked, &HashSet::new(), &p, now(), 30).unwrap();
        assert_eq!(picked.id, "a");

        let placed: HashSet<&str> = ["a"].into_iter().collect();
        let (picked, _) = best_task_for_slot(&s, &ranked, &placed, &p, now(), 30).unwrap();
        assert_eq!(picked.id, "c");

        let placed: HashSet<&str> = ["a", "c"].into_iter().collect();
        assert!(best_task_for_slot(&s, &ranked, &placed, &p, now(), 30).is_none());
    }

    #[test]
    fn ties_go_to_first_ranked() {
        let p = neutral_pattern();
        let first = Task::new("first", "x");
        let second = Task::new("second", "x");
        let ranked = vec![&first, &second];
        let (picked, _) = best_task_for_slot(
            &slot(9, 90, EnergyLevel::High),
            &ranked,
            &HashSet::new(),
            &p,
            now(),
            30,
        )
        .unwrap();
        assert_eq!(picked.id, "first");
    }
}
