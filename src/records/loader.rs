use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::{Project, Report};
use super::validation::{validate_project, validate_report, ValidationErrors};

pub const PROJECTS_DIR: &str = "project";
pub const PROJECT_FILE: &str = "project.json";
pub const RESULTS_DIR: &str = "results";
pub const RESULT_FILE: &str = "result.json";

/// Why a single record was skipped. Never fatal to a run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing {}", .path.display())]
    Missing { path: PathBuf },
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid record {}: {errors}", .path.display())]
    Invalid {
        path: PathBuf,
        errors: ValidationErrors,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Missing { path }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::Invalid { path, .. } => path,
        }
    }
}

/// Records that loaded cleanly, plus the ones that were skipped and why.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<LoadError>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Read-only view of a `project/<slug>/...` contribution tree.
#[derive(Debug, Clone)]
pub struct DataSource {
    root: PathBuf,
}

impl DataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join(PROJECTS_DIR)
    }

    pub fn results_dir(&self, slug: &str) -> PathBuf {
        self.projects_dir().join(slug).join(RESULTS_DIR)
    }

    /// Every `project/*/project.json` that parses and validates.
    ///
    /// A directory without a descriptor is reported as [`LoadError::Missing`].
    /// Order is by directory name.
    pub fn discover_projects(&self) -> Loaded<Project> {
        let mut loaded = Loaded::default();
        for dir in sorted_subdirs(&self.projects_dir()) {
            match load_present_record(&dir.join(PROJECT_FILE), validate_project) {
                Ok(project) => loaded.records.push(project),
                Err(e) => loaded.skipped.push(e),
            }
        }
        loaded
    }

    /// Every valid `result.json` under the project's results directory,
    /// ascending by submission time.
    pub fn get_reports(&self, slug: &str) -> Loaded<Report> {
        let mut loaded = Loaded::default();
        for dir in sorted_subdirs(&self.results_dir(slug)) {
            match load_present_record(&dir.join(RESULT_FILE), validate_report) {
                Ok(report) => loaded.records.push(report),
                Err(e) => loaded.skipped.push(e),
            }
        }
        sort_by_submission(&mut loaded.records);
        loaded
    }
}

/// Read, parse, and validate one JSON record file.
pub fn load_record<T>(
    path: &Path,
    validate: impl FnOnce(Value) -> Result<T, ValidationErrors>,
) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(value).map_err(|errors| LoadError::Invalid {
        path: path.to_path_buf(),
        errors,
    })
}

/// [`load_record`] for a file a directory is expected to hold.
fn load_present_record<T>(
    path: &Path,
    validate: impl FnOnce(Value) -> Result<T, ValidationErrors>,
) -> Result<T, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    load_record(path, validate)
}

/// Stable sort by parsed `submitted_at`. Unparseable timestamps go last,
/// keeping their relative order.
pub fn sort_by_submission(reports: &mut [Report]) {
    reports.sort_by_cached_key(|report| {
        let submitted = report.submitted_time();
        (submitted.is_none(), submitted)
    });
}

/// Subdirectories of `dir` in byte-wise name order. A missing or unreadable
/// directory has no entries.
fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    dirs
}
