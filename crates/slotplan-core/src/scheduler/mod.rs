//! Greedy task-to-slot scheduler.
//!
//! For each day the scheduler:
//! - cuts the pattern's work window into energy-tagged slots
//! - ranks the pending tasks once per run by urgency and remaining work
//! - walks the slots in order, giving each the best-matching task not yet
//!   placed that day
//! - aggregates the blocks into a [`DailySchedule`]
//!
//! This is a single forward pass with no backtracking. A slot's choice is
//! never revisited, even when a later slot would have suited a skipped task
//! better, so no optimality is claimed.

pub mod matching;
pub mod ranking;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{ConfigError, Result, ValidationError};
use crate::export::{self, ExportFormat};
use crate::pattern::ProductivityPattern;
use crate::schedule::{DailySchedule, ScheduleBlock};
use crate::slots::{generate_time_slots, TimeSlot};
use crate::stats::{self, ProductivityInsights, Suggestion, SuggestionThresholds};
use crate::task::{ProgressUpdate, Task};

pub use matching::{best_task_for_slot, estimate_efficiency, match_score, MatchScore};
pub use ranking::{rank_score, rank_tasks};

/// Tunable parameters of the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Days planned when the caller does not say
    #[serde(default = "default_horizon_days")]
    pub optimization_horizon_days: u32,
    /// Smallest slot worth creating, and the least remaining work a task
    /// needs to be considered
    #[serde(default = "default_min_block")]
    pub min_task_block_minutes: u32,
    /// Longest slot handed to a single task; focus durations above it are cut
    /// down to it
    #[serde(default = "default_max_block")]
    pub max_task_block_minutes: u32,
    /// Weight of urgency in the ranking key
    #[serde(default = "default_urgency_weight")]
    pub deadline_urgency_weight: f64,
    /// Blocks below this efficiency get a "move it" suggestion
    #[serde(default = "default_efficiency_threshold")]
    pub efficiency_threshold: f64,
    /// Work minutes above which a day counts as overloaded
    #[serde(default = "default_max_daily_work")]
    pub max_daily_work_minutes: u32,
    /// Minimum break minutes per work minute
    #[serde(default = "default_min_break_ratio")]
    pub min_break_ratio: f64,
    /// Flexibility below which a day counts as rigid
    #[serde(default = "default_min_flexibility")]
    pub min_flexibility: f64,
}

fn default_horizon_days() -> u32 {
    7
}
fn default_min_block() -> u32 {
    30
}
fn default_max_block() -> u32 {
    180
}
fn default_urgency_weight() -> f64 {
    2.0
}
fn default_efficiency_threshold() -> f64 {
    0.7
}
fn default_max_daily_work() -> u32 {
    480
}
fn default_min_break_ratio() -> f64 {
    0.15
}
fn default_min_flexibility() -> f64 {
    0.5
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            optimization_horizon_days: default_horizon_days(),
            min_task_block_minutes: default_min_block(),
            max_task_block_minutes: default_max_block(),
            deadline_urgency_weight: default_urgency_weight(),
            efficiency_threshold: default_efficiency_threshold(),
            max_daily_work_minutes: default_max_daily_work(),
            min_break_ratio: default_min_break_ratio(),
            min_flexibility: default_min_flexibility(),
        }
    }
}

impl OptimizerConfig {
    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: format!("optimizer.{key}"),
            message: message.to_string(),
        };
        if self.min_task_block_minutes == 0 {
            return Err(invalid("min_task_block_minutes", "must be greater than zero"));
        }
        if self.max_task_block_minutes < self.min_task_block_minutes {
            return Err(invalid(
                "max_task_block_minutes",
                "must not be below min_task_block_minutes",
            ));
        }
        if self.deadline_urgency_weight < 0.0 {
            return Err(invalid("deadline_urgency_weight", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.efficiency_threshold) {
            return Err(invalid("efficiency_threshold", "must be between 0 and 1"));
        }
        if self.min_break_ratio < 0.0 {
            return Err(invalid("min_break_ratio", "must not be negative"));
        }
        Ok(())
    }

    pub fn suggestion_thresholds(&self) -> SuggestionThresholds {
        SuggestionThresholds {
            efficiency_threshold: self.efficiency_threshold,
            max_daily_work_minutes: self.max_daily_work_minutes,
            min_break_ratio: self.min_break_ratio,
            min_flexibility: self.min_flexibility,
        }
    }
}

/// Owns patterns, tasks and generated schedules for a single caller.
///
/// Not synchronized; concurrent callers must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOptimizer {
    config: OptimizerConfig,
    patterns: HashMap<String, ProductivityPattern>,
    /// Insertion order is the ranking tie-breaker
    tasks: IndexMap<String, Task>,
    schedules: BTreeMap<NaiveDate, DailySchedule>,
}

impl ScheduleOptimizer {
    /// Create a new optimizer with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Register `pattern` for its user, replacing any previous one.
    pub fn create_productivity_pattern(&mut self, pattern: ProductivityPattern) -> &ProductivityPattern {
        tracing::info!(user = %pattern.user_id, "productivity pattern registered");
        let user = pattern.user_id.clone();
        self.patterns.insert(user.clone(), pattern);
        &self.patterns[&user]
    }

    pub fn pattern(&self, user_id: &str) -> Option<&ProductivityPattern> {
        self.patterns.get(user_id)
    }

    /// Add or replace a task. Returns its id.
    pub fn add_task(&mut self, task: Task) -> String {
        tracing::info!(task = %task.id, title = %task.title, "task added");
        let id = task.id.clone();
        self.tasks.insert(id.clone(), task);
        id
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Record progress on a task.
    pub fn update_task_progress(&mut self, task_id: &str, update: ProgressUpdate) -> Result<&Task> {
        let Some(task) = self.tasks.get_mut(task_id) else {
            tracing::error!(task = %task_id, "progress update for unknown task");
            return Err(ValidationError::UnknownTask(task_id.to_string()).into());
        };
        task.apply_progress(update);
        tracing::info!(
            task = %task_id,
            completed_minutes = task.completed_duration,
            ratio = task.completion_ratio,
            "task progress updated"
        );
        Ok(task)
    }

    /// Generate schedules for `days` days from `start_date`, ranking tasks
    /// against the current time.
    pub fn generate_optimal_schedule(
        &mut self,
        user_id: &str,
        start_date: NaiveDate,
        days: u32,
    ) -> BTreeMap<String, DailySchedule> {
        self.generate_optimal_schedule_at(user_id, start_date, days, Utc::now())
    }

    /// Generate schedules with urgency evaluated at `now`.
    ///
    /// Returns a map from ISO date to schedule. Days without any block are
    /// left out; an unknown user or an empty task pool yields an empty map.
    /// Every generated day replaces the stored schedule for that date.
    pub fn generate_optimal_schedule_at(
        &mut self,
        user_id: &str,
        start_date: NaiveDate,
        days: u32,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, DailySchedule> {
        let mut result = BTreeMap::new();

        let Some(pattern) = self.patterns.get(user_id) else {
            tracing::error!(user = %user_id, "no productivity pattern for user");
            return result;
        };
        let mut pattern = pattern.clone();
        if pattern.focus_duration > self.config.max_task_block_minutes {
            tracing::debug!(
                focus = pattern.focus_duration,
                cap = self.config.max_task_block_minutes,
                "focus duration capped"
            );
            pattern.focus_duration = self.config.max_task_block_minutes;
        }

        let pending = self.tasks.values().filter(|t| !t.is_completed());
        let ranked = rank_tasks(pending, now, self.config.deadline_urgency_weight);
        if ranked.is_empty() {
            tracing::info!(user = %user_id, "no pending tasks");
            return result;
        }

        let mut generated = Vec::new();
        for offset in 0..days {
            let date = start_date + Duration::days(offset as i64);
            let slots = generate_time_slots(date, &pattern, self.config.min_task_block_minutes);
            match allocate_day(date, &slots, &ranked, &pattern, &self.config, now) {
                Some(schedule) => generated.push(schedule),
                None => tracing::debug!(%date, slots = slots.len(), "no schedule for day"),
            }
        }

        for schedule in generated {
            result.insert(schedule.date_key(), schedule.clone());
            self.schedules.insert(schedule.date, schedule);
        }

        tracing::info!(user = %user_id, days = result.len(), "schedules generated");
        result
    }

    /// Stored schedule for `date`, if one was generated.
    pub fn schedule(&self, date: NaiveDate) -> Option<&DailySchedule> {
        self.schedules.get(&date)
    }

    pub fn schedules(&self) -> &BTreeMap<NaiveDate, DailySchedule> {
        &self.schedules
    }

    /// Rule-based adjustment suggestions for the stored schedule of `date`.
    pub fn suggest_schedule_adjustments(&self, date: NaiveDate) -> Vec<Suggestion> {
        match self.schedules.get(&date) {
            Some(schedule) => {
                stats::suggest_adjustments(schedule, &self.config.suggestion_thresholds())
            }
            None => Vec::new(),
        }
    }

    /// Export the stored schedule of `date`; `None` when there is none.
    pub fn export_schedule(&self, date: NaiveDate, format: ExportFormat) -> Result<Option<String>> {
        self.schedules
            .get(&date)
            .map(|schedule| export::export_schedule(schedule, format))
            .transpose()
    }

    /// Insights over the completed tasks, `None` for an unknown user.
    pub fn productivity_insights(&self, user_id: &str) -> Option<ProductivityInsights> {
        let pattern = self.patterns.get(user_id)?;
        Some(stats::productivity_insights(pattern, self.tasks.values()))
    }
}

/// Run the greedy pass over one day's slots.
pub fn allocate_day(
    date: NaiveDate,
    slots: &[TimeSlot],
    ranked: &[&Task],
    pattern: &ProductivityPattern,
    config: &OptimizerConfig,
    now: DateTime<Utc>,
) -> Option<DailySchedule> {
    if slots.is_empty() {
        return None;
    }

    let mut blocks: Vec<ScheduleBlock> = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();

    for slot in slots {
        let Some((task, score)) =
            best_task_for_slot(slot, ranked, &placed, pattern, now, config.min_task_block_minutes)
        else {
            tracing::debug!(start = %slot.start, "slot left empty");
            continue;
        };

        let efficiency = estimate_efficiency(task, slot, pattern);
        let break_before = if blocks.is_empty() { 0 } else { pattern.break_duration };
        let block = ScheduleBlock::new(blocks.len(), task.clone(), slot.clone(), efficiency)
            .with_breaks(break_before, 0);

        tracing::debug!(
            start = %slot.start,
            task = %task.id,
            score = score.total(),
            efficiency,
            covers_remaining = block.covers_remaining,
            "slot assigned"
        );

        placed.insert(task.id.as_str());
        blocks.push(block);
    }

    DailySchedule::assemble(date, blocks)
}
