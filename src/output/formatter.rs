use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::pipeline::RunStats;
use crate::records::{LoadError, Report};
use crate::scoring::ScoreResult;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Elapsed time rounded to milliseconds ("1s 250ms")
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = Duration::from_millis(elapsed.as_millis() as u64);
    humantime::format_duration(millis).to_string()
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// End-of-run summary printed after aggregation
pub fn format_run_summary(stats: &RunStats, elapsed: Duration, use_colors: bool) -> String {
    let header = format!(
        "Aggregated {} ({} with results)",
        plural(stats.projects, "project", "projects"),
        stats.projects_with_results
    );
    let skipped = format!(
        "{}, {}",
        plural(stats.skipped_projects, "project", "projects"),
        plural(stats.skipped_reports, "result", "results")
    );
    let any_skipped = stats.skipped_projects + stats.skipped_reports > 0;

    let rows = [
        ("Results", stats.reports.to_string()),
        ("Contributors", stats.contributors.to_string()),
        ("Points", stats.points.to_string()),
    ];

    let mut lines = Vec::with_capacity(6);
    if use_colors {
        lines.push(header.bold().to_string());
        for (label, value) in rows {
            lines.push(format!("  {:<13} {}", format!("{}:", label), value.cyan()));
        }
        let skipped = if any_skipped {
            skipped.yellow().to_string()
        } else {
            skipped.dimmed().to_string()
        };
        lines.push(format!("  {:<13} {}", "Skipped:", skipped));
        lines.push(format!("  {:<13} {}", "Elapsed:", format_elapsed(elapsed).dimmed()));
    } else {
        lines.push(header);
        for (label, value) in rows {
            lines.push(format!("  {:<13} {}", format!("{}:", label), value));
        }
        lines.push(format!("  {:<13} {}", "Skipped:", skipped));
        lines.push(format!("  {:<13} {}", "Elapsed:", format_elapsed(elapsed)));
    }
    lines.join("\n")
}

/// One block per rejected record: its path, then each reason indented
pub fn format_rejections<'a>(
    rejected: impl IntoIterator<Item = &'a LoadError>,
    use_colors: bool,
) -> String {
    let blocks: Vec<String> = rejected
        .into_iter()
        .map(|error| {
            let path = error.path().display().to_string();
            let reasons: Vec<String> = match error {
                LoadError::Invalid { errors, .. } => errors.iter().map(ToString::to_string).collect(),
                LoadError::Missing { .. } => vec!["file not found".to_string()],
                LoadError::Read { source, .. } => vec![source.to_string()],
                LoadError::Parse { source, .. } => vec![source.to_string()],
            };
            let mut block = if use_colors {
                path.red().to_string()
            } else {
                path
            };
            for reason in reasons {
                block.push_str("\n  - ");
                block.push_str(&reason);
            }
            block
        })
        .collect();

    if blocks.is_empty() {
        "All records are valid.".to_string()
    } else {
        blocks.join("\n")
    }
}

/// Base weight, each bonus, and the total for a single report
pub fn format_score_breakdown(report: &Report, scored: &ScoreResult, use_colors: bool) -> String {
    let severity = match scored.severity {
        Some(s) => s.as_str().to_string(),
        None => format!("{}, unrecognized", report.severity),
    };
    let header = format!("{} ({}) by {}", report.id, severity, report.author_github);

    let mut rows = vec![("Base".to_string(), format!("{}", scored.base))];
    for bonus in &scored.bonuses {
        rows.push((bonus.kind.label().to_string(), format!("+{}", bonus.points)));
    }
    let total = scored.score.to_string();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if use_colors {
        lines.push(header.bold().to_string());
        for (label, value) in rows {
            lines.push(format!("  {:<24} {:>4}", format!("{}:", label), value));
        }
        lines.push(format!("  {:<24} {:>4}", "Total:", total.green().bold()));
    } else {
        lines.push(header);
        for (label, value) in rows {
            lines.push(format!("  {:<24} {:>4}", format!("{}:", label), value));
        }
        lines.push(format!("  {:<24} {:>4}", "Total:", total));
    }
    lines.join("\n")
}
