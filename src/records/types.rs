use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const CO_AUTHORS_FIELD: &str = "co_authors";
const STEPS_FIELD: &str = "steps";
const REPRO_CMDS_FIELD: &str = "repro_cmds";

/// Closed set of severities that carry a base weight.
///
/// Reports store their severity as the raw string they were submitted with;
/// anything outside this set still validates but is worth nothing and is
/// left out of every breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Exact, case-sensitive match ("high" is not High).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Project descriptor read from `project/<slug>/project.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub status: String,
    pub branch: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commit: Option<String>,
}

/// Optional descriptor strings: any non-string value reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// A single submitted finding read from `project/<slug>/results/<id>/result.json`.
///
/// Only the required fields are typed. Everything else, including
/// `co_authors`, `steps` and `repro_cmds`, stays in `extra` exactly as
/// submitted so the record is written back out unchanged in the project
/// bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub author_github: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub impact: String,
    pub submitted_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Report {
    pub fn severity_level(&self) -> Option<Severity> {
        Severity::parse(&self.severity)
    }

    /// String entries of `co_authors`, in listed order. A value that is not
    /// a list, and any entry that is not a string, is ignored.
    pub fn co_authors(&self) -> impl Iterator<Item = &str> {
        self.extra
            .get(CO_AUTHORS_FIELD)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Primary author first, then co-authors in listed order.
    ///
    /// Duplicates are not collapsed: a handle listed twice is credited twice.
    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.author_github.as_str()).chain(self.co_authors())
    }

    pub fn steps(&self) -> Option<&Value> {
        self.extra.get(STEPS_FIELD)
    }

    pub fn repro_cmds(&self) -> Option<&Value> {
        self.extra.get(REPRO_CMDS_FIELD)
    }

    pub fn has_steps(&self) -> bool {
        is_non_empty(self.steps())
    }

    pub fn has_repro_cmds(&self) -> bool {
        is_non_empty(self.repro_cmds())
    }

    pub fn submitted_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.submitted_at)
    }
}

/// Arrays and strings count when they have a length; every other JSON type is empty.
fn is_non_empty(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(text)) => !text.is_empty(),
        _ => false,
    }
}

/// Parse a submission timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC), or a
/// bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
