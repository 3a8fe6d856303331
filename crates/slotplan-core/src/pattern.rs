//! Per-user productivity pattern.
//!
//! A pattern bundles everything the scheduler needs to know about a person:
//! when they work, how long they can focus, how their energy moves through the
//! day and how efficiently they handle each kind of task. Defaults come from
//! factory functions so every pattern owns its own maps.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::energy::EnergyCurve;
use crate::error::ValidationError;
use crate::task::TaskType;

/// Efficiency multiplier per task type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskPreferences(BTreeMap<TaskType, f64>);

impl TaskPreferences {
    /// Empty preferences: every type gets a neutral 1.0.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Preferences of a typical researcher.
    pub fn research_default() -> Self {
        let mut prefs = Self::neutral();
        for task_type in TaskType::ALL {
            let multiplier = match task_type {
                TaskType::Research => 1.0,
                TaskType::Writing => 0.9,
                TaskType::Analysis => 1.1,
                TaskType::Coding => 1.0,
                TaskType::Reading => 0.8,
                TaskType::Meeting => 0.7,
                TaskType::Review => 0.9,
                TaskType::Admin => 0.6,
            };
            prefs.set(task_type, multiplier);
        }
        prefs
    }

    pub fn set(&mut self, task_type: TaskType, multiplier: f64) {
        self.0.insert(task_type, multiplier);
    }

    /// Multiplier for `task_type`, 1.0 when unset.
    pub fn multiplier(&self, task_type: TaskType) -> f64 {
        self.0.get(&task_type).copied().unwrap_or(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskType, f64)> + '_ {
        self.0.iter().map(|(t, m)| (*t, *m))
    }
}

/// A fixed pause during the work day (lunch, seminar) that no slot may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    #[serde(with = "clock")]
    pub start: NaiveTime,
    #[serde(with = "clock")]
    pub end: NaiveTime,
}

impl BreakWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether `[start, end)` intersects this window.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start < end && self.end > start
    }
}

/// Productivity pattern for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityPattern {
    pub user_id: String,
    #[serde(default = "EnergyCurve::research_default")]
    pub energy: EnergyCurve,
    #[serde(default = "TaskPreferences::research_default")]
    pub task_preferences: TaskPreferences,
    #[serde(default = "default_work_start", with = "clock")]
    pub work_start: NaiveTime,
    #[serde(default = "default_work_end", with = "clock")]
    pub work_end: NaiveTime,
    /// Minutes of focused work per slot
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    /// Minutes of rest after each slot
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    /// Minutes needed to get into flow
    #[serde(default = "default_context_building_time")]
    pub context_building_time: u32,
    #[serde(default)]
    pub break_windows: Vec<BreakWindow>,
    /// Explicit most-productive hours; derived from the curve when empty
    #[serde(default)]
    pub peak_hours: Vec<u8>,
}

fn default_work_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_work_end() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_focus_duration() -> u32 {
    90
}
fn default_break_duration() -> u32 {
    15
}
fn default_context_building_time() -> u32 {
    10
}

impl ProductivityPattern {
    /// Pattern with default energy curve, preferences and a 09:00-18:00 day.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            energy: EnergyCurve::research_default(),
            task_preferences: TaskPreferences::research_default(),
            work_start: default_work_start(),
            work_end: default_work_end(),
            focus_duration: default_focus_duration(),
            break_duration: default_break_duration(),
            context_building_time: default_context_building_time(),
            break_windows: Vec::new(),
            peak_hours: Vec::new(),
        }
    }

    pub fn with_energy(mut self, energy: EnergyCurve) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_task_preferences(mut self, prefs: TaskPreferences) -> Self {
        self.task_preferences = prefs;
        self
    }

    pub fn with_work_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.work_start = start;
        self.work_end = end;
        self
    }

    pub fn with_focus(mut self, focus_duration: u32, break_duration: u32) -> Self {
        self.focus_duration = focus_duration;
        self.break_duration = break_duration;
        self
    }

    pub fn with_context_building_time(mut self, minutes: u32) -> Self {
        self.context_building_time = minutes;
        self
    }

    pub fn with_break_window(mut self, window: BreakWindow) -> Self {
        self.break_windows.push(window);
        self
    }

    pub fn with_peak_hours(mut self, hours: Vec<u8>) -> Self {
        self.peak_hours = hours;
        self
    }

    /// Check the pattern describes a usable work day.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.work_end <= self.work_start {
            return Err(ValidationError::InvalidTimeRange {
                start: self.work_start,
                end: self.work_end,
            });
        }
        if self.focus_duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "focus_duration".into(),
                message: "must be greater than zero".into(),
            });
        }
        if let Some(w) = self.break_windows.iter().find(|w| w.end <= w.start) {
            return Err(ValidationError::InvalidTimeRange {
                start: w.start,
                end: w.end,
            });
        }
        if let Some((task_type, m)) = self.task_preferences.iter().find(|(_, m)| *m <= 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("task_preferences.{task_type}"),
                message: format!("multiplier must be positive, got {m}"),
            });
        }
        Ok(())
    }
}

/// `HH:MM` wall-clock times; `HH:MM:SS` is accepted on input.
pub(crate) mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }
}
