//! Schedule analysis: adjustment suggestions for a generated day and
//! insights over completed work.

mod insights;
mod suggestions;

pub use insights::{
    productivity_insights, recommended_peak_hours, ProductivityInsights, TypePerformance,
    FALLBACK_PEAK_HOURS,
};

pub use suggestions::{
    suggest_adjustments, Suggestion, SuggestionPriority, SuggestionThresholds, SuggestionType,
};
