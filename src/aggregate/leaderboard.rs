use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::contributors::ContributorLedger;
use super::stats::SeverityBreakdown;
use crate::scoring::ScoringTable;

pub const PERIOD_ALL_TIME: &str = "all-time";

/// `leaderboard.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub last_updated: String,
    pub period: String,
    pub scoring: ScoringTable,
    pub contributors: Vec<LeaderboardEntry>,
    pub totals: LeaderboardTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub github: String,
    pub display: String,
    pub points: u64,
    pub reports: u64,
    pub avg_score: f64,
    pub by_severity: SeverityBreakdown,
    pub bonuses: BonusPoints,
    pub by_project: Vec<String>,
}

/// Points earned from each bonus kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPoints {
    pub first_report: u64,
    pub quality: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardTotals {
    pub contributors: usize,
    pub reports: u64,
    pub points: u64,
}

pub fn build_leaderboard(
    ledger: &ContributorLedger,
    scoring: &ScoringTable,
    last_updated: &str,
) -> Leaderboard {
    let mut contributors: Vec<LeaderboardEntry> = ledger
        .iter()
        .map(|(handle, stat)| LeaderboardEntry {
            github: handle.to_string(),
            display: handle.to_string(),
            points: stat.points,
            reports: stat.reports,
            avg_score: stat.avg_score(),
            by_severity: stat.by_severity,
            bonuses: BonusPoints {
                first_report: 0,
                quality: stat.quality_points,
            },
            by_project: stat.projects.clone(),
        })
        .collect();
    rank(&mut contributors);

    let totals = LeaderboardTotals {
        contributors: contributors.len(),
        reports: ledger.report_count(),
        points: contributors.iter().map(|c| c.points).sum(),
    };

    Leaderboard {
        last_updated: last_updated.to_string(),
        period: PERIOD_ALL_TIME.to_string(),
        scoring: *scoring,
        contributors,
        totals,
    }
}

/// Points descending, then handle ascending.
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| a.github.cmp(&b.github))
}
