//! Rule-based schedule adjustment suggestions.
//!
//! Each check looks at one aspect of a finished [`DailySchedule`] and emits a
//! record when it falls outside its threshold. Suggestions are advisory; the
//! schedule is never modified.

use serde::{Deserialize, Serialize};

use crate::schedule::DailySchedule;

/// Kind of adjustment being suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// A block sits in a slot that suits it poorly
    EfficiencyImprovement,
    /// The day holds more work than is sustainable
    WorkloadReduction,
    /// Too little rest between blocks
    BreakImprovement,
    /// The day is hard to rearrange
    FlexibilityImprovement,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::EfficiencyImprovement => "efficiency_improvement",
            SuggestionType::WorkloadReduction => "workload_reduction",
            SuggestionType::BreakImprovement => "break_improvement",
            SuggestionType::FlexibilityImprovement => "flexibility_improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    Low,
    Medium,
    High,
}

impl SuggestionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionPriority::Low => "low",
            SuggestionPriority::Medium => "medium",
            SuggestionPriority::High => "high",
        }
    }
}

/// One suggested adjustment with the numbers that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    /// Block the suggestion is about, for per-block checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Observed value (efficiency, minutes, ratio or score)
    pub current_value: f64,
    /// Threshold the value was compared against
    pub threshold: f64,
    pub suggestion: String,
    pub priority: SuggestionPriority,
}

/// Limits the checks compare against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionThresholds {
    pub efficiency_threshold: f64,
    pub max_daily_work_minutes: u32,
    pub min_break_ratio: f64,
    pub min_flexibility: f64,
}

impl Default for SuggestionThresholds {
    fn default() -> Self {
        Self {
            efficiency_threshold: 0.7,
            max_daily_work_minutes: 480,
            min_break_ratio: 0.15,
            min_flexibility: 0.5,
        }
    }
}

/// Run all checks against `schedule`, in a fixed order: per-block
/// efficiency, workload, breaks, flexibility.
pub fn suggest_adjustments(
    schedule: &DailySchedule,
    thresholds: &SuggestionThresholds,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for block in &schedule.blocks {
        if block.estimated_efficiency < thresholds.efficiency_threshold {
            suggestions.push(Suggestion {
                kind: SuggestionType::EfficiencyImprovement,
                block_id: Some(block.block_id.clone()),
                current_value: block.estimated_efficiency,
                threshold: thresholds.efficiency_threshold,
                suggestion: format!(
                    "Consider moving {} to a higher-energy time slot",
                    block.task.title
                ),
                priority: SuggestionPriority::Medium,
            });
        }
    }

    if schedule.total_work_time > thresholds.max_daily_work_minutes {
        suggestions.push(Suggestion {
            kind: SuggestionType::WorkloadReduction,
            block_id: None,
            current_value: schedule.total_work_time as f64,
            threshold: thresholds.max_daily_work_minutes as f64,
            suggestion: "Consider reducing workload or splitting tasks across multiple days"
                .to_string(),
            priority: SuggestionPriority::High,
        });
    }

    let min_breaks = schedule.total_work_time as f64 * thresholds.min_break_ratio;
    if (schedule.total_break_time as f64) < min_breaks {
        suggestions.push(Suggestion {
            kind: SuggestionType::BreakImprovement,
            block_id: None,
            current_value: schedule.break_ratio(),
            threshold: thresholds.min_break_ratio,
            suggestion: "Add more breaks to maintain productivity".to_string(),
            priority: SuggestionPriority::Medium,
        });
    }

    if schedule.flexibility_score < thresholds.min_flexibility {
        suggestions.push(Suggestion {
            kind: SuggestionType::FlexibilityImprovement,
            block_id: None,
            current_value: schedule.flexibility_score,
            threshold: thresholds.min_flexibility,
            suggestion: "Consider breaking down large tasks or rearranging schedule".to_string(),
            priority: SuggestionPriority::Low,
        });
    }

    suggestions
}
