//! Schedule export.
//!
//! Two formats: pretty JSON of the whole [`DailySchedule`], and a plain text
//! report meant for humans. The text layout is stable enough that
//! [`parse_text_totals`] can read the block durations and efficiencies back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{Result, ValidationError};
use crate::schedule::DailySchedule;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" => Ok(ExportFormat::Text),
            _ => Err(ValidationError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Text => f.write_str("text"),
        }
    }
}

/// Render `schedule` in `format`.
pub fn export_schedule(schedule: &DailySchedule, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(schedule)?),
        ExportFormat::Text => Ok(render_text(schedule)),
    }
}

/// Plain text report of one day.
pub fn render_text(schedule: &DailySchedule) -> String {
    let mut lines = vec![
        format!("Schedule for {}", schedule.date_key()),
        "=".repeat(RULE_WIDTH),
    ];

    for block in &schedule.blocks {
        lines.push(format!(
            "{}-{}: {}",
            block.slot.start.format("%H:%M"),
            block.slot.end.format("%H:%M"),
            block.task.title
        ));
        lines.push(format!("  Type: {}", block.task.task_type));
        lines.push(format!("  Efficiency: {}", percent(block.estimated_efficiency)));
        lines.push(format!("  Duration: {}min", block.slot.duration_minutes));
        lines.push(String::new());
    }

    lines.push(format!("Total work time: {}min", schedule.total_work_time));
    lines.push(format!("Total break time: {}min", schedule.total_break_time));
    lines.push(format!(
        "Average efficiency: {}",
        percent(schedule.efficiency_score)
    ));

    lines.join("\n")
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Figures recovered from a text export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTotals {
    pub date: NaiveDate,
    pub block_count: usize,
    /// Sum of the block durations
    pub total_work_time: u32,
    /// As printed in the footer
    pub total_break_time: u32,
    /// Mean of the printed block efficiencies, as a ratio
    pub average_efficiency: f64,
}

/// Parse a report produced by [`render_text`].
///
/// Work time and mean efficiency are derived from the block lines; the
/// footer's work total must agree with them.
pub fn parse_text_totals(text: &str) -> Result<ExportTotals> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (n, header) = lines.next().ok_or_else(|| malformed(1, "empty export"))?;
    let date_str = header
        .strip_prefix("Schedule for ")
        .ok_or_else(|| malformed(n, "missing 'Schedule for' header"))?;
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| malformed(n, &format!("bad date: {e}")))?;

    let mut block_count = 0;
    let mut work_time = 0u32;
    let mut efficiencies = Vec::new();
    let mut footer_work = None;
    let mut footer_break = None;

    for (n, line) in lines {
        if let Some(rest) = line.strip_prefix("  Duration: ") {
            work_time += parse_minutes(rest).ok_or_else(|| malformed(n, "bad duration"))?;
            block_count += 1;
        } else if let Some(rest) = line.strip_prefix("  Efficiency: ") {
            efficiencies.push(parse_percent(rest).ok_or_else(|| malformed(n, "bad efficiency"))?);
        } else if let Some(rest) = line.strip_prefix("Total work time: ") {
            footer_work = Some(parse_minutes(rest).ok_or_else(|| malformed(n, "bad work total"))?);
        } else if let Some(rest) = line.strip_prefix("Total break time: ") {
            footer_break = Some(parse_minutes(rest).ok_or_else(|| malformed(n, "bad break total"))?);
        }
    }

    if efficiencies.len() != block_count {
        return Err(malformed(0, "efficiency and duration lines do not pair up"));
    }
    let footer_work = footer_work.ok_or_else(|| malformed(0, "missing work total"))?;
    if footer_work != work_time {
        return Err(malformed(
            0,
            &format!("work total {footer_work}min does not match blocks ({work_time}min)"),
        ));
    }

    let average_efficiency = if efficiencies.is_empty() {
        0.0
    } else {
        efficiencies.iter().sum::<f64>() / efficiencies.len() as f64
    };

    Ok(ExportTotals {
        date,
        block_count,
        total_work_time: work_time,
        total_break_time: footer_break.unwrap_or(0),
        average_efficiency,
    })
}

fn parse_minutes(raw: &str) -> Option<u32> {
    raw.trim().strip_suffix("min")?.parse().ok()
}

fn parse_percent(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().strip_suffix('%')?.parse().ok()?;
    Some(value / 100.0)
}

fn malformed(line: usize, message: &str) -> crate::error::CoreError {
    ValidationError::MalformedExport {
        line,
        message: message.to_string(),
    }
    .into()
}
