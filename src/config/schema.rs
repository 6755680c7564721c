use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::urls::UrlTemplates;
use crate::scoring::ScoringTable;

/// Aggregator configuration, read from `hivex.yaml`.
///
/// Every field has a default, so an empty file (or no file) is valid.
///
/// Example YAML:
/// ```yaml
/// input_dir: .
/// output_dir: data_out
/// urls:
///   github_branch: "https://github.com/acme/bounties/tree/{branch}"
///   results: "https://acme.github.io/bounties/results-{slug}.json"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory containing the `project/` tree
    pub input_dir: PathBuf,

    /// Directory the JSON documents are written to
    pub output_dir: PathBuf,

    pub urls: UrlTemplates,

    pub scoring: ScoringTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("data_out"),
            urls: UrlTemplates::default(),
            scoring: ScoringTable::default(),
        }
    }
}
