pub mod bundle;
pub mod contributors;
pub mod index;
pub mod leaderboard;
pub mod stats;

pub use bundle::{build_bundle, bundle_file_name, ProjectBundle, ProjectSummary};
pub use contributors::{ContributorLedger, ContributorStat};
pub use index::{build_index, IndexEntry, IndexSummary, ProjectIndex};
pub use leaderboard::{build_leaderboard, Leaderboard, LeaderboardEntry, LeaderboardTotals};
pub use stats::{ProjectStats, SeverityBreakdown};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::UrlTemplates;
use crate::records::{Project, Report};
use crate::scoring::{calculate_score, ScoreResult, ScoringTable};

/// A validated project and its valid reports in chronological order,
/// each scored once when the entry is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReports {
    pub project: Project,
    pub reports: Vec<Report>,
    scores: Vec<ScoreResult>,
}

impl ProjectReports {
    pub fn new(project: Project, reports: Vec<Report>, table: &ScoringTable) -> Self {
        let scores = reports.iter().map(|r| calculate_score(r, table)).collect();
        Self {
            project,
            reports,
            scores,
        }
    }

    /// Each report with its score, in report order.
    pub fn scored(&self) -> impl Iterator<Item = (&Report, &ScoreResult)> {
        self.reports.iter().zip(&self.scores)
    }

    pub fn total_points(&self) -> u64 {
        self.scores.iter().map(|s| u64::from(s.score)).sum()
    }
}

/// Every document produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outputs {
    pub index: ProjectIndex,
    /// Only projects with at least one report, in project order.
    pub bundles: Vec<ProjectBundle>,
    pub leaderboard: Leaderboard,
    pub ledger: ContributorLedger,
}

/// Fold all projects into the index, the per-project bundles, and the leaderboard.
///
/// Pure: the same input and `generated_at` always give the same output.
pub fn aggregate(
    projects: &[ProjectReports],
    table: &ScoringTable,
    urls: &UrlTemplates,
    generated_at: DateTime<Utc>,
) -> Outputs {
    let stamp = format_timestamp(generated_at);
    let ledger = ContributorLedger::from_projects(projects);

    Outputs {
        index: build_index(projects, urls, &stamp),
        bundles: projects.iter().filter_map(build_bundle).collect(),
        leaderboard: build_leaderboard(&ledger, table, &stamp),
        ledger,
    }
}

/// `2024-01-02T03:04:05.678Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn demo_project() -> Project {
        Project {
            slug: "demo".to_string(),
            title: "Demo".to_string(),
            status: "active".to_string(),
            branch: "main".to_string(),
            target_url: None,
            commit: None,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_timestamp_millis() {
        assert_eq!(format_timestamp(generated_at()), "2024-01-03T12:00:00.000Z");
    }

    #[test]
    fn test_aggregate_demo_scenario() {
        let r1: Report = serde_json::from_value(json!({
            "id": "R1",
            "author_github": "alice",
            "type": "bug",
            "severity": "High",
            "impact": "x",
            "submitted_at": "2024-01-01T00:00:00Z",
            "steps": ["a"]
        }))
        .unwrap();
        let r2: Report = serde_json::from_value(json!({
            "id": "R2",
            "author_github": "alice",
            "co_authors": ["bob"],
            "type": "bug",
            "severity": "Critical",
            "impact": "y",
            "submitted_at": "2024-01-02T00:00:00Z"
        }))
        .unwrap();
        let table = ScoringTable::default();
        let projects = vec![ProjectReports::new(demo_project(), vec![r1, r2], &table)];

        let outputs = aggregate(
            &projects,
            &table,
            &UrlTemplates::default(),
            generated_at(),
        );

        assert_eq!(outputs.ledger.get("alice").unwrap().points, 17);
        assert_eq!(outputs.ledger.get("bob").unwrap().points, 10);

        let board = &outputs.leaderboard;
        assert_eq!(board.contributors[0].github, "alice");
        assert_eq!(board.contributors[1].github, "bob");
        assert_eq!(board.totals.points, 27);
        assert_eq!(board.totals.reports, 2);
        assert_eq!(board.last_updated, "2024-01-03T12:00:00.000Z");

        let bundle = &outputs.bundles[0];
        assert_eq!(bundle.project.last_updated, "2024-01-02T00:00:00Z");
        assert_eq!(
            serde_json::to_value(bundle.stats.by_severity).unwrap(),
            json!({ "Critical": 1, "High": 1, "Medium": 0, "Low": 0 })
        );
        assert_eq!(bundle.stats.total_results, 2);
        assert_eq!(outputs.index.projects[0].stats, bundle.stats);
    }

    #[test]
    fn test_aggregate_project_without_reports() {
        let projects = vec![ProjectReports::new(demo_project(), vec![], &ScoringTable::default())];
        let outputs = aggregate(
            &projects,
            &ScoringTable::default(),
            &UrlTemplates::default(),
            generated_at(),
        );
        assert!(outputs.bundles.is_empty());
        assert_eq!(outputs.index.projects.len(), 1);
        assert!(outputs.leaderboard.contributors.is_empty());
    }

    #[test]
    fn test_documents_use_scores_from_entry() {
        let report: Report = serde_json::from_value(json!({
            "id": "R1",
            "author_github": "alice",
            "type": "bug",
            "severity": "High",
            "impact": "x",
            "submitted_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let scored_with = ScoringTable {
            high: 40,
            ..ScoringTable::default()
        };
        let projects = vec![ProjectReports::new(demo_project(), vec![report], &scored_with)];
        assert_eq!(projects[0].total_points(), 40);

        // Folding does not score again, so a different table cannot leak in.
        let outputs = aggregate(
            &projects,
            &ScoringTable::default(),
            &UrlTemplates::default(),
            generated_at(),
        );
        assert_eq!(outputs.ledger.get("alice").unwrap().points, 40);
        assert_eq!(outputs.index.projects[0].stats.total_points, 40);
        assert_eq!(outputs.bundles[0].stats.total_points, 40);
        assert_eq!(outputs.leaderboard.totals.points, 40);
    }
}
