//! # Slotplan Core Library
//!
//! This library plans research work into the day. Given a user's productivity
//! pattern and a pool of tasks it produces one schedule per calendar day,
//! together with summary metrics and rule-based adjustment suggestions. The
//! `slotplan` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Slots**: each day's work window is cut into focus-sized slots tagged
//!   with the energy level of their starting hour
//! - **Scheduler**: a greedy pass that ranks tasks once, then gives every slot
//!   the best-matching task not yet placed that day
//! - **Stats**: adjustment suggestions for a generated day and insights over
//!   completed work
//! - **Storage**: TOML-based configuration of the optimizer's tunables
//!
//! ## Key Components
//!
//! - [`ScheduleOptimizer`]: owns patterns, tasks and generated schedules
//! - [`ProductivityPattern`]: per-user energy curve, preferences and work day
//! - [`DailySchedule`]: the blocks of one day with its metrics
//! - [`Config`]: application configuration management

pub mod energy;
pub mod error;
pub mod export;
pub mod pattern;
pub mod schedule;
pub mod scheduler;
pub mod slots;
pub mod stats;
pub mod storage;
pub mod task;

pub use energy::{EnergyCurve, EnergyLevel, EnergyWindow};
pub use error::{ConfigError, CoreError, ValidationError};
pub use export::{parse_text_totals, ExportFormat, ExportTotals};
pub use pattern::{BreakWindow, ProductivityPattern, TaskPreferences};
pub use schedule::{DailySchedule, ScheduleBlock};
pub use scheduler::{OptimizerConfig, ScheduleOptimizer};
pub use slots::{generate_time_slots, TimeSlot};
pub use stats::{ProductivityInsights, Suggestion, SuggestionPriority, SuggestionType};
pub use storage::Config;
pub use task::{ProgressUpdate, Task, TaskPriority, TaskType, TimeOfDay};
