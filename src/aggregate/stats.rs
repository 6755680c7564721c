use serde::{Deserialize, Serialize};

use super::ProjectReports;
use crate::records::{Report, Severity};

/// Report counts per known severity.
///
/// Reports with an unrecognized severity are not counted in any bucket, so
/// [`SeverityBreakdown::total`] can be lower than the number of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    #[serde(rename = "Critical")]
    pub critical: u64,
    #[serde(rename = "High")]
    pub high: u64,
    #[serde(rename = "Medium")]
    pub medium: u64,
    #[serde(rename = "Low")]
    pub low: u64,
}

impl SeverityBreakdown {
    pub fn from_reports(reports: &[Report]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |breakdown, report| breakdown.counted(&report.severity))
    }

    /// This breakdown with one more report of `raw_severity`.
    pub fn counted(mut self, raw_severity: &str) -> Self {
        if let Some(severity) = Severity::parse(raw_severity) {
            *self.slot_mut(severity) += 1;
        }
        self
    }

    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> u64 {
        Severity::ALL.iter().map(|&s| self.get(s)).sum()
    }

    fn slot_mut(&mut self, severity: Severity) -> &mut u64 {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }
}

/// Per-project totals shared by the index entry and the result bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_results: usize,
    pub by_severity: SeverityBreakdown,
    pub total_points: u64,
}

impl ProjectStats {
    pub fn from_entry(entry: &ProjectReports) -> Self {
        Self {
            total_results: entry.reports.len(),
            by_severity: SeverityBreakdown::from_reports(&entry.reports),
            total_points: entry.total_points(),
        }
    }
}
