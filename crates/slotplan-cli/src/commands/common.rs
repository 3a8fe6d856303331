//! Shared input handling for the planning commands.

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Args;
use std::error::Error;
use std::path::{Path, PathBuf};

use slotplan_core::{Config, ProductivityPattern, ScheduleOptimizer, Task};

/// Pattern, task and config inputs shared by the planning commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Productivity pattern file (.json or .toml)
    #[arg(long)]
    pub pattern: PathBuf,
    /// Task file (JSON array of tasks)
    #[arg(long)]
    pub tasks: PathBuf,
    /// Config file to use instead of ~/.config/slotplan/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Evaluate deadlines against this instant (RFC 3339) instead of now
    #[arg(long)]
    pub now: Option<String>,
}

impl InputArgs {
    pub fn now(&self) -> Result<DateTime<Utc>, Box<dyn Error>> {
        match &self.now {
            Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
                .map_err(|e| format!("invalid --now '{raw}': {e}"))?
                .with_timezone(&Utc)),
            None => Ok(Utc::now()),
        }
    }
}

/// Optimizer loaded with the inputs, plus the pattern's user id.
pub struct Loaded {
    pub optimizer: ScheduleOptimizer,
    pub user_id: String,
    pub now: DateTime<Utc>,
}

pub fn load(input: &InputArgs) -> Result<Loaded, Box<dyn Error>> {
    let config = match &input.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default(),
    };
    let pattern = load_pattern(&input.pattern)?;
    let tasks = load_tasks(&input.tasks)?;

    tracing::debug!(
        pattern = %input.pattern.display(),
        tasks = tasks.len(),
        "inputs loaded"
    );

    let mut optimizer = ScheduleOptimizer::with_config(config.optimizer);
    let user_id = pattern.user_id.clone();
    optimizer.create_productivity_pattern(pattern);
    for task in tasks {
        optimizer.add_task(task);
    }

    Ok(Loaded {
        optimizer,
        user_id,
        now: input.now()?,
    })
}

/// Read a pattern from JSON or TOML, chosen by file extension.
pub fn load_pattern(path: &Path) -> Result<ProductivityPattern, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read pattern file {}: {e}", path.display()))?;
    let pattern: ProductivityPattern = match extension(path).as_deref() {
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => {
            return Err(format!(
                "unsupported pattern file {}: expected .json or .toml",
                path.display()
            )
            .into())
        }
    };
    pattern.validate()?;
    Ok(pattern)
}

/// Read a JSON array of tasks.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read task file {}: {e}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&content)?;
    Ok(tasks)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Parse `YYYY-MM-DD`, defaulting to today.
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, Box<dyn Error>> {
    match raw {
        Some(s) => Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))?),
        None => Ok(Local::now().date_naive()),
    }
}
