//! Task ranking.
//!
//! Orders pending tasks into the priority pool the matcher draws from. The
//! ranking does not reserve slots; it only decides who is looked at first,
//! which matters because the matcher keeps the first of equally scored tasks.

use chrono::{DateTime, Utc};

use crate::task::Task;

/// Composite ranking key of a task.
///
/// `urgency_weight * urgency + deadline_pressure + 0.1 * remaining_hours`,
/// where deadline pressure is `max(0, 10 - days_left)` for tasks with a
/// deadline and zero otherwise.
pub fn rank_score(task: &Task, now: DateTime<Utc>, urgency_weight: f64) -> f64 {
    let urgency = task.urgency_score_at(now);
    let remaining_hours = task.remaining_duration() as f64 / 60.0;
    let deadline_pressure = task
        .days_until_deadline(now)
        .map(|days| (10 - days).max(0) as f64)
        .unwrap_or(0.0);

    urgency * urgency_weight + deadline_pressure + remaining_hours * 0.1
}

/// Sort tasks by [`rank_score`], highest first. The sort is stable, so tasks
/// with equal scores keep their input order.
pub fn rank_tasks<'a, I>(tasks: I, now: DateTime<Utc>, urgency_weight: f64) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut scored: Vec<(&Task, f64)> = tasks
        .into_iter()
        .map(|t| (t, rank_score(t, now, urgency_weight)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(t, _)| t).collect()
}
