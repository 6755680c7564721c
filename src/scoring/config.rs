use serde::{Deserialize, Serialize};

use crate::records::Severity;

pub const CRITICAL_POINTS: u32 = 10;
pub const HIGH_POINTS: u32 = 6;
pub const MEDIUM_POINTS: u32 = 3;
pub const LOW_POINTS: u32 = 1;
pub const FIRST_REPORT_BONUS: u32 = 2;
pub const QUALITY_BONUS: u32 = 1;

/// Point values used by the scoring engine.
///
/// Serializes to exactly the `scoring` object published in `leaderboard.json`.
/// `first_report_bonus` is published but not awarded by [`calculate_score`].
///
/// Example YAML override:
/// ```yaml
/// scoring:
///   Critical: 12
///   quality_bonus: 2
/// ```
///
/// [`calculate_score`]: super::calculate_score
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringTable {
    #[serde(rename = "Critical")]
    pub critical: u32,
    #[serde(rename = "High")]
    pub high: u32,
    #[serde(rename = "Medium")]
    pub medium: u32,
    #[serde(rename = "Low")]
    pub low: u32,
    pub first_report_bonus: u32,
    pub quality_bonus: u32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            critical: CRITICAL_POINTS,
            high: HIGH_POINTS,
            medium: MEDIUM_POINTS,
            low: LOW_POINTS,
            first_report_bonus: FIRST_REPORT_BONUS,
            quality_bonus: QUALITY_BONUS,
        }
    }
}

impl ScoringTable {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Base points for a raw severity string; unknown severities are worth 0.
    pub fn base_points(&self, raw_severity: &str) -> u32 {
        Severity::parse(raw_severity)
            .map(|severity| self.weight(severity))
            .unwrap_or(0)
    }
}
