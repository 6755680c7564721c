use serde::{Deserialize, Serialize};

use super::stats::ProjectStats;
use super::ProjectReports;
use crate::records::Report;

/// `results-<slug>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBundle {
    pub project: ProjectSummary,
    pub stats: ProjectStats,
    pub results: Vec<Report>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub slug: String,
    pub title: String,
    pub status: String,
    pub target_url: Option<String>,
    pub branch: String,
    pub commit: Option<String>,
    /// `submitted_at` of the last report in chronological order.
    pub last_updated: String,
}

impl ProjectBundle {
    pub fn file_name(&self) -> String {
        bundle_file_name(&self.project.slug)
    }
}

pub fn bundle_file_name(slug: &str) -> String {
    format!("results-{}.json", slug)
}

/// `None` for a project with no valid reports.
///
/// Expects `entry.reports` already in chronological order.
pub fn build_bundle(entry: &ProjectReports) -> Option<ProjectBundle> {
    let last = entry.reports.last()?;
    let project = &entry.project;
    Some(ProjectBundle {
        project: ProjectSummary {
            slug: project.slug.clone(),
            title: project.title.clone(),
            status: project.status.clone(),
            target_url: project.target_url.clone(),
            branch: project.branch.clone(),
            commit: project.commit.clone(),
            last_updated: last.submitted_at.clone(),
        },
        stats: ProjectStats::from_entry(entry),
        results: entry.reports.clone(),
    })
}
