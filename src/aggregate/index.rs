use serde::{Deserialize, Serialize};

use super::stats::ProjectStats;
use super::ProjectReports;
use crate::config::UrlTemplates;

pub const INDEX_VERSION: &str = "1.0";

/// `index.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub version: String,
    pub last_updated: String,
    pub projects: Vec<IndexEntry>,
    pub summary: IndexSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub slug: String,
    pub title: String,
    pub status: String,
    pub branch: String,
    pub github_branch_url: String,
    pub readme_raw_url: String,
    pub results_url: String,
    pub stats: ProjectStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_results: usize,
}

/// One entry per validated project, including projects with no reports.
pub fn build_index(
    projects: &[ProjectReports],
    urls: &UrlTemplates,
    last_updated: &str,
) -> ProjectIndex {
    let entries: Vec<IndexEntry> = projects
        .iter()
        .map(|entry| {
            let project = &entry.project;
            let links = urls.resolve(&project.branch, &project.slug);
            IndexEntry {
                slug: project.slug.clone(),
                title: project.title.clone(),
                status: project.status.clone(),
                branch: project.branch.clone(),
                github_branch_url: links.github_branch_url,
                readme_raw_url: links.readme_raw_url,
                results_url: links.results_url,
                stats: ProjectStats::from_entry(entry),
            }
        })
        .collect();

    let summary = IndexSummary {
        total_projects: projects.len(),
        active_projects: projects.iter().filter(|p| p.project.is_active()).count(),
        total_results: entries.iter().map(|e| e.stats.total_results).sum(),
    };

    ProjectIndex {
        version: INDEX_VERSION.to_string(),
        last_updated: last_updated.to_string(),
        projects: entries,
        summary,
    }
}
