use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, Outputs, ProjectReports};
use crate::config::Config;
use crate::output::write_outputs;
use crate::records::{DataSource, LoadError};
use crate::scoring::ScoringTable;

/// Validated input plus every record that was skipped on the way.
#[derive(Debug, Default)]
pub struct Collected {
    pub projects: Vec<ProjectReports>,
    pub skipped_projects: Vec<LoadError>,
    pub skipped_reports: Vec<LoadError>,
}

impl Collected {
    pub fn skipped(&self) -> impl Iterator<Item = &LoadError> {
        self.skipped_projects.iter().chain(self.skipped_reports.iter())
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_projects.len() + self.skipped_reports.len()
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub projects: usize,
    pub projects_with_results: usize,
    pub reports: u64,
    pub contributors: usize,
    pub points: u64,
    pub skipped_projects: usize,
    pub skipped_reports: usize,
}

impl RunStats {
    pub fn new(collected: &Collected, outputs: &Outputs) -> Self {
        Self {
            projects: outputs.index.projects.len(),
            projects_with_results: outputs.bundles.len(),
            reports: outputs.leaderboard.totals.reports,
            contributors: outputs.leaderboard.totals.contributors,
            points: outputs.leaderboard.totals.points,
            skipped_projects: collected.skipped_projects.len(),
            skipped_reports: collected.skipped_reports.len(),
        }
    }
}

#[derive(Debug)]
pub struct Run {
    pub outputs: Outputs,
    pub stats: RunStats,
}

/// Discover projects, then load each project's reports in discovery order.
///
/// Record-level problems are logged and collected, never returned as errors.
pub fn collect(source: &DataSource, table: &ScoringTable) -> Collected {
    let discovered = source.discover_projects();
    info!(
        "Found {} projects in {}",
        discovered.records.len(),
        source.projects_dir().display()
    );

    let mut collected = Collected::default();
    for error in discovered.skipped {
        warn!("Skipping project: {}", error);
        collected.skipped_projects.push(error);
    }

    for project in discovered.records {
        let loaded = source.get_reports(&project.slug);
        info!(project = %project.slug, "Found {} results", loaded.records.len());

        for error in loaded.skipped {
            warn!(project = %project.slug, "Skipping result: {}", error);
            collected.skipped_reports.push(error);
        }
        let entry = ProjectReports::new(project, loaded.records, table);
        for (report, scored) in entry.scored() {
            debug!(
                project = %entry.project.slug,
                report = %report.id,
                severity = %report.severity,
                base = scored.base,
                score = scored.score,
                "Scored result"
            );
        }
        collected.projects.push(entry);
    }
    collected
}

/// Load and fold everything under `config.input_dir`. Writes nothing.
pub fn run(config: &Config, generated_at: DateTime<Utc>) -> (Collected, Run) {
    let source = DataSource::new(config.input_dir.clone());
    let collected = collect(&source, &config.scoring);
    let outputs = aggregate(
        &collected.projects,
        &config.scoring,
        &config.urls,
        generated_at,
    );
    let stats = RunStats::new(&collected, &outputs);
    (collected, Run { outputs, stats })
}

/// Persist a run's documents. Any failure here is fatal to the run.
pub fn publish(run: &Run, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let written = write_outputs(output_dir, &run.outputs)?;
    for path in &written {
        debug!("Wrote {}", path.display());
    }
    info!("Wrote {} documents to {}", written.len(), output_dir.display());
    Ok(written)
}
