//! Productivity insights over completed work.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pattern::ProductivityPattern;
use crate::task::{Task, TaskType};

/// Peak hours recommended when neither the pattern nor its curve names any.
pub const FALLBACK_PEAK_HOURS: [u8; 4] = [10, 11, 15, 16];

/// A task type with its mean actual/estimated duration ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypePerformance {
    pub task_type: TaskType,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityInsights {
    pub most_efficient_task_type: Option<TypePerformance>,
    pub least_efficient_task_type: Option<TypePerformance>,
    /// Mean of `completed / estimated` duration per type
    pub task_type_performance: BTreeMap<TaskType, f64>,
    pub recommended_peak_hours: Vec<u8>,
    pub average_focus_duration: u32,
    pub optimal_break_duration: u32,
    pub total_completed_tasks: usize,
    pub average_task_completion_ratio: f64,
}

/// Summarize the completed tasks among `tasks` against `pattern`.
pub fn productivity_insights<'a, I>(pattern: &ProductivityPattern, tasks: I) -> ProductivityInsights
where
    I: IntoIterator<Item = &'a Task>,
{
    let completed: Vec<&Task> = tasks.into_iter().filter(|t| t.is_completed()).collect();

    let mut ratios: BTreeMap<TaskType, Vec<f64>> = BTreeMap::new();
    for task in &completed {
        if task.estimated_duration > 0 {
            let ratio = task.completed_duration as f64 / task.estimated_duration as f64;
            ratios.entry(task.task_type).or_default().push(ratio);
        }
    }
    let task_type_performance: BTreeMap<TaskType, f64> = ratios
        .into_iter()
        .map(|(t, rs)| (t, rs.iter().sum::<f64>() / rs.len() as f64))
        .collect();

    let as_perf = |(t, r): (&TaskType, &f64)| TypePerformance {
        task_type: *t,
        ratio: *r,
    };
    // Ties go to the first type in key order, for max as well as min.
    let most = task_type_performance
        .iter()
        .rev()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(as_perf);
    let least = task_type_performance
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(as_perf);

    let average_task_completion_ratio = if completed.is_empty() {
        0.0
    } else {
        completed.iter().map(|t| t.completion_ratio).sum::<f64>() / completed.len() as f64
    };

    ProductivityInsights {
        most_efficient_task_type: most,
        least_efficient_task_type: least,
        task_type_performance,
        recommended_peak_hours: recommended_peak_hours(pattern),
        average_focus_duration: pattern.focus_duration,
        optimal_break_duration: pattern.break_duration,
        total_completed_tasks: completed.len(),
        average_task_completion_ratio,
    }
}

/// Explicit peak hours, else the curve's High and Peak hours, else
/// [`FALLBACK_PEAK_HOURS`].
pub fn recommended_peak_hours(pattern: &ProductivityPattern) -> Vec<u8> {
    if !pattern.peak_hours.is_empty() {
        return pattern.peak_hours.clone();
    }
    let from_curve = pattern.energy.focus_hours();
    if from_curve.is_empty() {
        FALLBACK_PEAK_HOURS.to_vec()
    } else {
        from_curve
    }
}
