//! Task model for research work.
//!
//! Tasks are created by the caller and only ever change through progress
//! updates. Completion is soft: a task counts as done once its completion
//! ratio reaches 1.0, and it is never removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of research work.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Investigation and exploratory research
    Research,
    /// Paper writing
    Writing,
    /// Data analysis
    Analysis,
    /// Programming
    Coding,
    /// Literature reading
    Reading,
    /// Meetings and discussions
    Meeting,
    /// Reviewing and refereeing
    Review,
    /// Administrative work
    Admin,
}

impl TaskType {
    pub const ALL: [TaskType; 8] = [
        TaskType::Research,
        TaskType::Writing,
        TaskType::Analysis,
        TaskType::Coding,
        TaskType::Reading,
        TaskType::Meeting,
        TaskType::Review,
        TaskType::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Research => "research",
            TaskType::Writing => "writing",
            TaskType::Analysis => "analysis",
            TaskType::Coding => "coding",
            TaskType::Reading => "reading",
            TaskType::Meeting => "meeting",
            TaskType::Review => "review",
            TaskType::Admin => "admin",
        }
    }
}

impl Default for TaskType {
    fn default() -> Self {
        TaskType::Research
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority on a 1-5 ordinal scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Optional = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    Critical = 5,
}

impl TaskPriority {
    /// Ordinal value used as the fallback urgency.
    pub fn value(&self) -> f64 {
        *self as i32 as f64
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Preferred period of the day for a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before noon
    Morning,
    /// 12:00 to 18:00
    Afternoon,
    /// From 18:00
    Evening,
}

impl TimeOfDay {
    /// Whether a slot starting at `hour` falls in this period.
    pub fn matches_hour(&self, hour: u32) -> bool {
        match self {
            TimeOfDay::Morning => hour < 12,
            TimeOfDay::Afternoon => (12..18).contains(&hour),
            TimeOfDay::Evening => hour >= 18,
        }
    }
}

/// Progress report for a task.
///
/// Both fields are optional; `completed_minutes` is added to the work already
/// done, `completion_ratio` replaces the stored ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub completed_minutes: Option<u32>,
    pub completion_ratio: Option<f64>,
}

impl ProgressUpdate {
    pub fn minutes(minutes: u32) -> Self {
        Self {
            completed_minutes: Some(minutes),
            completion_ratio: None,
        }
    }

    pub fn ratio(ratio: f64) -> Self {
        Self {
            completed_minutes: None,
            completion_ratio: Some(ratio),
        }
    }
}

/// A unit of research work to be placed on the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Estimated effort in minutes
    pub estimated_duration: u32,
    /// Minutes of work already done
    #[serde(default)]
    pub completed_duration: u32,
    /// 0.0 to 1.0; a task is complete at 1.0
    #[serde(default)]
    pub completion_ratio: f64,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Needs uninterrupted high-energy attention
    #[serde(default = "default_true")]
    pub requires_deep_focus: bool,
    #[serde(default)]
    pub can_be_interrupted: bool,
    #[serde(default)]
    pub preferred_time_of_day: Option<TimeOfDay>,
    /// Ids of tasks this one depends on. Not consulted by the scheduler.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Task {
    /// Create a task with default characteristics: medium priority research,
    /// one hour of deep-focus work, no deadline.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            task_type: TaskType::Research,
            priority: TaskPriority::Medium,
            estimated_duration: 60,
            completed_duration: 0,
            completion_ratio: 0.0,
            deadline: None,
            requires_deep_focus: true,
            can_be_interrupted: false,
            preferred_time_of_day: None,
            dependencies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration = minutes;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_deep_focus(mut self, deep_focus: bool) -> Self {
        self.requires_deep_focus = deep_focus;
        self
    }

    pub fn interruptible(mut self, can_be_interrupted: bool) -> Self {
        self.can_be_interrupted = can_be_interrupted;
        self
    }

    pub fn with_preferred_time(mut self, time_of_day: TimeOfDay) -> Self {
        self.preferred_time_of_day = Some(time_of_day);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Minutes still to be done, never negative.
    pub fn remaining_duration(&self) -> u32 {
        self.estimated_duration.saturating_sub(self.completed_duration)
    }

    pub fn is_completed(&self) -> bool {
        self.completion_ratio >= 1.0
    }

    /// Whole days until the deadline, floored (a deadline two hours ago is -1).
    pub fn days_until_deadline(&self, now: DateTime<Utc>) -> Option<i64> {
        self.deadline
            .map(|deadline| (deadline - now).num_seconds().div_euclid(86_400))
    }

    /// Deadline-driven urgency. Without a deadline, or with one more than a
    /// week away, this is the priority's ordinal value.
    pub fn urgency_score_at(&self, now: DateTime<Utc>) -> f64 {
        match self.days_until_deadline(now) {
            None => self.priority.value(),
            Some(days) if days <= 0 => 10.0,
            Some(days) if days <= 1 => 8.0,
            Some(days) if days <= 3 => 6.0,
            Some(days) if days <= 7 => 4.0,
            Some(_) => self.priority.value(),
        }
    }

    pub fn urgency_score(&self) -> f64 {
        self.urgency_score_at(Utc::now())
    }

    /// Apply a progress report.
    pub fn apply_progress(&mut self, update: ProgressUpdate) {
        if let Some(minutes) = update.completed_minutes {
            self.completed_duration = self.completed_duration.saturating_add(minutes);
        }
        if let Some(ratio) = update.completion_ratio {
            self.completion_ratio = ratio;
        }
    }
}
