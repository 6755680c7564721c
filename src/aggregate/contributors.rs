use std::collections::BTreeMap;

use super::stats::SeverityBreakdown;
use super::ProjectReports;
use crate::records::Report;
use crate::scoring::ScoreResult;

/// Running totals for one contributor handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorStat {
    pub points: u64,
    pub reports: u64,
    /// Distinct project slugs, in the order the contributor was first credited.
    pub projects: Vec<String>,
    pub by_severity: SeverityBreakdown,
    pub quality_points: u64,
}

impl ContributorStat {
    fn record(&mut self, slug: &str, report: &Report, scored: &ScoreResult) {
        self.points += u64::from(scored.score);
        self.reports += 1;
        self.quality_points += u64::from(scored.quality_points());
        self.by_severity = self.by_severity.counted(&report.severity);
        if !self.projects.iter().any(|p| p == slug) {
            self.projects.push(slug.to_string());
        }
    }

    pub fn avg_score(&self) -> f64 {
        if self.reports == 0 {
            0.0
        } else {
            self.points as f64 / self.reports as f64
        }
    }
}

/// Contributor statistics folded over a stream of scored reports.
///
/// Each report's full score goes to its author and to every co-author.
/// Built by value: [`ContributorLedger::credit`] consumes the ledger and
/// returns the updated one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorLedger {
    contributors: BTreeMap<String, ContributorStat>,
    reports: u64,
    report_points: u64,
}

impl ContributorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every report of every project, in order.
    pub fn from_projects(projects: &[ProjectReports]) -> Self {
        projects.iter().fold(Self::new(), Self::fold_project)
    }

    pub fn fold_project(self, entry: &ProjectReports) -> Self {
        let slug = entry.project.slug.as_str();
        entry
            .scored()
            .fold(self, |ledger, (report, scored)| ledger.credit(slug, report, scored))
    }

    pub fn credit(mut self, slug: &str, report: &Report, scored: &ScoreResult) -> Self {
        for handle in report.contributors() {
            self.contributors
                .entry(handle.to_string())
                .or_default()
                .record(slug, report, scored);
        }
        self.reports += 1;
        self.report_points += u64::from(scored.score);
        self
    }

    pub fn get(&self, handle: &str) -> Option<&ContributorStat> {
        self.contributors.get(handle)
    }

    /// Contributors in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContributorStat)> {
        self.contributors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    /// Distinct reports folded in, regardless of how many contributors each credited.
    pub fn report_count(&self) -> u64 {
        self.reports
    }

    /// Sum of individual report scores, counting each report once.
    pub fn report_points(&self) -> u64 {
        self.report_points
    }

    /// Sum of contributor points; exceeds [`Self::report_points`] when
    /// co-authored reports fan out.
    pub fn credited_points(&self) -> u64 {
        self.contributors.values().map(|s| s.points).sum()
    }
}
