//! Energy levels and the diurnal energy curve.
//!
//! An energy curve maps hours of the day to a coarse cognitive-capacity
//! level. Hours without an explicit entry are treated as [`EnergyLevel::Medium`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Ordinal proxy for cognitive capacity at a given hour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low = 1,
    Medium = 2,
    High = 3,
    Peak = 4,
}

impl EnergyLevel {
    /// Multiplier applied to the base efficiency of work done at this level.
    pub fn efficiency_multiplier(&self) -> f64 {
        match self {
            EnergyLevel::Peak => 1.2,
            EnergyLevel::High => 1.0,
            EnergyLevel::Medium => 0.8,
            EnergyLevel::Low => 0.6,
        }
    }

    /// Match-score bonus for placing a deep-focus task at this level.
    pub fn deep_focus_bonus(&self) -> f64 {
        match self {
            EnergyLevel::Peak => 2.0,
            EnergyLevel::High => 1.5,
            EnergyLevel::Medium => 1.0,
            EnergyLevel::Low => 0.3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnergyLevel::Peak => "PEAK",
            EnergyLevel::High => "HIGH",
            EnergyLevel::Medium => "MEDIUM",
            EnergyLevel::Low => "LOW",
        }
    }
}

impl Default for EnergyLevel {
    fn default() -> Self {
        EnergyLevel::Medium
    }
}

/// Energy level registered for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyWindow {
    /// Hour of day (0-23)
    pub hour: u8,
    pub level: EnergyLevel,
}

/// Hour-to-energy mapping for one user.
///
/// Deserialization sorts the windows and rejects duplicate hours or hours
/// past 23.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct EnergyCurve {
    /// Registered hours, kept sorted by hour with at most one entry each.
    #[serde(default)]
    pub windows: Vec<EnergyWindow>,
}

#[derive(Deserialize)]
struct RawCurve {
    #[serde(default)]
    windows: Vec<EnergyWindow>,
}

impl TryFrom<RawCurve> for EnergyCurve {
    type Error = ValidationError;

    fn try_from(raw: RawCurve) -> Result<Self, Self::Error> {
        let mut curve = Self::new();
        for window in raw.windows {
            if window.hour > 23 {
                return Err(ValidationError::InvalidValue {
                    field: "energy.windows.hour".to_string(),
                    message: format!("hour {} is outside 0-23", window.hour),
                });
            }
            if curve.find_window(window.hour).is_some() {
                return Err(ValidationError::InvalidValue {
                    field: "energy.windows.hour".to_string(),
                    message: format!("hour {} is registered twice", window.hour),
                });
            }
            curve.set(window.hour, window.level);
        }
        Ok(curve)
    }
}

impl EnergyCurve {
    /// Empty curve: every hour reads as Medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Typical researcher's day: sharp late morning, post-lunch dip, second
    /// wind mid-afternoon.
    pub fn research_default() -> Self {
        use EnergyLevel::*;
        Self::from_levels([
            (9, High),
            (10, Peak),
            (11, Peak),
            (12, Medium),
            (13, Low),
            (14, Medium),
            (15, High),
            (16, High),
            (17, Medium),
            (18, Low),
            (19, Low),
            (20, Medium),
        ])
    }

    /// Same level for all 24 hours.
    pub fn uniform(level: EnergyLevel) -> Self {
        Self::from_levels((0..24).map(|hour| (hour, level)))
    }

    pub fn from_levels(levels: impl IntoIterator<Item = (u8, EnergyLevel)>) -> Self {
        let mut curve = Self::new();
        for (hour, level) in levels {
            curve.set(hour, level);
        }
        curve
    }

    /// Register `level` for `hour`, replacing any previous entry.
    /// Hours outside 0-23 are ignored.
    pub fn set(&mut self, hour: u8, level: EnergyLevel) {
        if hour > 23 {
            return;
        }
        match self.windows.binary_search_by_key(&hour, |w| w.hour) {
            Ok(idx) => self.windows[idx].level = level,
            Err(idx) => self.windows.insert(idx, EnergyWindow { hour, level }),
        }
    }

    /// Find window by hour.
    pub fn find_window(&self, hour: u8) -> Option<&EnergyWindow> {
        self.windows.iter().find(|w| w.hour == hour)
    }

    /// Energy level for `hour`, Medium when unregistered.
    pub fn level_at(&self, hour: u32) -> EnergyLevel {
        u8::try_from(hour)
            .ok()
            .and_then(|h| self.find_window(h))
            .map(|w| w.level)
            .unwrap_or_default()
    }

    /// Hours registered as Peak.
    pub fn peak_hours(&self) -> Vec<u8> {
        self.hours_where(|level| level == EnergyLevel::Peak)
    }

    /// Hours registered as Low.
    pub fn low_hours(&self) -> Vec<u8> {
        self.hours_where(|level| level == EnergyLevel::Low)
    }

    /// Hours at High or above, the default candidates for deep work.
    pub fn focus_hours(&self) -> Vec<u8> {
        self.hours_where(|level| level >= EnergyLevel::High)
    }

    fn hours_where(&self, pred: impl Fn(EnergyLevel) -> bool) -> Vec<u8> {
        self.windows
            .iter()
            .filter(|w| pred(w.level))
            .map(|w| w.hour)
            .collect()
    }

    /// Render the curve between `from_hour` and `to_hour` (exclusive) as an
    /// ASCII bar chart.
    pub fn render_ascii_chart(&self, from_hour: u32, to_hour: u32) -> String {
        let mut output = String::from("\nEnergy Curve:\n");
        output.push_str(&"─".repeat(40));
        output.push('\n');

        for hour in from_hour..to_hour.min(24) {
            let level = self.level_at(hour);
            let bar_length = level as usize * 6;
            let registered = u8::try_from(hour)
                .ok()
                .and_then(|h| self.find_window(h))
                .is_some();
            output.push_str(&format!(
                "{:02}:00 {}{} {}{}\n",
                hour,
                "█".repeat(bar_length),
                " ".repeat(24 - bar_length),
                level.name(),
                if registered { "" } else { " ·" }
            ));
        }

        output.push_str(&"─".repeat(40));
        output.push_str("\n· = not registered (defaults to MEDIUM)\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_hours_read_as_medium() {
        let curve = EnergyCurve::new();
        assert_eq!(curve.level_at(3), EnergyLevel::Medium);
        assert_eq!(curve.level_at(99), EnergyLevel::Medium);
    }

    #[test]
    fn research_default_shape() {
        let curve = EnergyCurve::research_default();
        assert_eq!(curve.level_at(9), EnergyLevel::High);
        assert_eq!(curve.level_at(10), EnergyLevel::Peak);
        assert_eq!(curve.level_at(13), EnergyLevel::Low);
        assert_eq!(curve.peak_hours(), vec![10, 11]);
        assert_eq!(curve.low_hours(), vec![13, 18, 19]);
        assert_eq!(curve.focus_hours(), vec![9, 10, 11, 15, 16]);
    }

    #[test]
    fn factories_return_independent_curves() {
        let mut a = EnergyCurve::research_default();
        let b = EnergyCurve::research_default();
        a.set(13, EnergyLevel::Peak);
        assert_eq!(b.level_at(13), EnergyLevel::Low);
    }

    #[test]
    fn set_keeps_windows_sorted_and_unique() {
        let mut curve = EnergyCurve::new();
        curve.set(15, EnergyLevel::High);
        curve.set(9, EnergyLevel::Low);
        curve.set(15, EnergyLevel::Peak);
        curve.set(24, EnergyLevel::Peak);
        let hours: Vec<u8> = curve.windows.iter().map(|w| w.hour).collect();
        assert_eq!(hours, vec![9, 15]);
        assert_eq!(curve.level_at(15), EnergyLevel::Peak);
    }

    #[test]
    fn deserialized_windows_are_sorted() {
        let json = r#"{"windows":[{"hour":15,"level":"high"},{"hour":9,"level":"low"}]}"#;
        let mut curve: EnergyCurve = serde_json::from_str(json).unwrap();
        let hours: Vec<u8> = curve.windows.iter().map(|w| w.hour).collect();
        assert_eq!(hours, vec![9, 15]);

        curve.set(15, EnergyLevel::Peak);
        let hours: Vec<u8> = curve.windows.iter().map(|w| w.hour).collect();
        assert_eq!(hours, vec![9, 15]);
        assert_eq!(curve.level_at(15), EnergyLevel::Peak);
    }

    #[test]
    fn deserialize_rejects_bad_hours() {
        let dup = r#"{"windows":[{"hour":9,"level":"high"},{"hour":9,"level":"low"}]}"#;
        let err = serde_json::from_str::<EnergyCurve>(dup).unwrap_err();
        assert!(err.to_string().contains("hour 9 is registered twice"));

        let late = r#"{"windows":[{"hour":24,"level":"high"}]}"#;
        let err = serde_json::from_str::<EnergyCurve>(late).unwrap_err();
        assert!(err.to_string().contains("outside 0-23"));

        let empty: EnergyCurve = serde_json::from_str("{}").unwrap();
        assert!(empty.windows.is_empty());
    }

    #[test]
    fn uniform_covers_whole_day() {
        let curve = EnergyCurve::uniform(EnergyLevel::Peak);
        assert_eq!(curve.windows.len(), 24);
        assert!((0..24).all(|h| curve.level_at(h) == EnergyLevel::Peak));
    }

    #[test]
    fn multipliers_are_ordered() {
        assert!(EnergyLevel::Peak.efficiency_multiplier() > EnergyLevel::High.efficiency_multiplier());
        assert!(EnergyLevel::Medium.deep_focus_bonus() > EnergyLevel::Low.deep_focus_bonus());
    }

    #[test]
    fn chart_marks_unregistered_hours() {
        let curve = EnergyCurve::from_levels([(9, EnergyLevel::Peak)]);
        let chart = curve.render_ascii_chart(9, 11);
        assert!(chart.contains("09:00"));
        assert!(chart.contains("PEAK"));
        assert!(chart.contains("10:00"));
        assert!(chart.contains("MEDIUM ·"));
        assert!(!chart.contains("11:00"));
    }
}
