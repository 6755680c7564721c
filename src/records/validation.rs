use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use super::types::{Project, Report};

pub const PROJECT_REQUIRED_FIELDS: [&str; 4] = ["slug", "title", "status", "branch"];

pub const REPORT_REQUIRED_FIELDS: [&str; 6] = [
    "id",
    "author_github",
    "type",
    "severity",
    "impact",
    "submitted_at",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` must be a string")]
    NotAString(&'static str),
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
    #[error("slug `{0}` cannot be used as a file name")]
    UnsafeSlug(String),
    #[error("{0}")]
    Malformed(String),
}

/// Every problem found in one record, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a parsed `project.json` document and convert it to a [`Project`].
pub fn validate_project(value: Value) -> Result<Project, ValidationErrors> {
    let mut errors = required_field_errors(&value, &PROJECT_REQUIRED_FIELDS);

    if let Some(Value::String(slug)) = value.get("slug") {
        if !slug.is_empty() && !is_safe_slug(slug) {
            errors.push(ValidationError::UnsafeSlug(slug.clone()));
        }
    }

    into_record(value, errors)
}

/// Validate a parsed `result.json` document and convert it to a [`Report`].
pub fn validate_report(value: Value) -> Result<Report, ValidationErrors> {
    let errors = required_field_errors(&value, &REPORT_REQUIRED_FIELDS);
    into_record(value, errors)
}

pub fn is_valid_project(value: &Value) -> bool {
    validate_project(value.clone()).is_ok()
}

pub fn is_valid_report(value: &Value) -> bool {
    validate_report(value.clone()).is_ok()
}

/// Presence, string type, and non-emptiness of each required field.
/// `null` counts as missing.
fn required_field_errors(value: &Value, fields: &[&'static str]) -> Vec<ValidationError> {
    let Some(object) = value.as_object() else {
        return vec![ValidationError::NotAnObject];
    };
    fields
        .iter()
        .filter_map(|&field| check_string_field(object, field))
        .collect()
}

fn check_string_field(object: &Map<String, Value>, field: &'static str) -> Option<ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Some(ValidationError::Missing(field)),
        Some(Value::String(text)) if text.is_empty() => Some(ValidationError::Empty(field)),
        Some(Value::String(_)) => None,
        Some(_) => Some(ValidationError::NotAString(field)),
    }
}

/// Slugs name output files, so they must stay a single path component.
fn is_safe_slug(slug: &str) -> bool {
    slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

fn into_record<T: DeserializeOwned>(
    value: Value,
    errors: Vec<ValidationError>,
) -> Result<T, ValidationErrors> {
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }
    // Only the required strings are typed and they are known good here.
    serde_json::from_value(value)
        .map_err(|e| ValidationErrors(vec![ValidationError::Malformed(e.to_string())]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project_json() -> Value {
        json!({
            "slug": "demo",
            "title": "Demo App",
            "status": "active",
            "branch": "main",
            "target_url": "https://demo.example.com"
        })
    }

    fn report_json() -> Value {
        json!({
            "id": "r1",
            "author_github": "alice",
            "type": "xss",
            "severity": "High",
            "impact": "session theft",
            "submitted_at": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_valid_project() {
        let project = validate_project(project_json()).unwrap();
        assert_eq!(project.slug, "demo");
        assert_eq!(project.branch, "main");
        assert_eq!(project.target_url.as_deref(), Some("https://demo.example.com"));
        assert!(project.commit.is_none());
    }

    #[test]
    fn test_project_missing_branch_rejected() {
        let mut value = project_json();
        value.as_object_mut().unwrap().remove("branch");
        let errors = validate_project(value).unwrap_err();
        assert_eq!(errors.0, vec![ValidationError::Missing("branch")]);
    }

    #[test]
    fn test_project_collects_all_errors() {
        let value = json!({ "slug": "", "title": 7, "status": null });
        let errors = validate_project(value).unwrap_err();
        assert_eq!(
            errors.0,
            vec![
                ValidationError::Empty("slug"),
                ValidationError::NotAString("title"),
                ValidationError::Missing("status"),
                ValidationError::Missing("branch"),
            ]
        );
    }

    #[test]
    fn test_project_unsafe_slug_rejected() {
        let mut value = project_json();
        value["slug"] = json!("../escape");
        let errors = validate_project(value).unwrap_err();
        assert_eq!(
            errors.0,
            vec![ValidationError::UnsafeSlug("../escape".to_string())]
        );
    }

    #[test]
    fn test_non_object_rejected() {
        let errors = validate_report(json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(errors.0, vec![ValidationError::NotAnObject]);
    }

    #[test]
    fn test_valid_report() {
        let report = validate_report(report_json()).unwrap();
        assert_eq!(report.kind, "xss");
        assert_eq!(report.co_authors().count(), 0);
    }

    #[test]
    fn test_report_missing_submitted_at_rejected() {
        let mut value = report_json();
        value.as_object_mut().unwrap().remove("submitted_at");
        assert!(!is_valid_report(&value));
        let errors = validate_report(value).unwrap_err();
        assert_eq!(errors.0, vec![ValidationError::Missing("submitted_at")]);
    }

    #[test]
    fn test_report_non_string_severity_rejected() {
        let mut value = report_json();
        value["severity"] = json!(3);
        let errors = validate_report(value).unwrap_err();
        assert_eq!(errors.0, vec![ValidationError::NotAString("severity")]);
    }

    #[test]
    fn test_report_unknown_severity_still_valid() {
        let mut value = report_json();
        value["severity"] = json!("Informational");
        assert!(is_valid_report(&value));
    }

    #[test]
    fn test_project_odd_optional_fields_still_valid() {
        let mut value = project_json();
        value["commit"] = json!(123);
        assert!(is_valid_project(&value));

        value["target_url"] = json!(false);
        let project = validate_project(value).unwrap();
        assert!(project.target_url.is_none());
        assert!(project.commit.is_none());
    }

    #[test]
    fn test_report_odd_co_authors_still_valid() {
        let mut value = report_json();
        value["co_authors"] = json!(["bob", null]);
        let report = validate_report(value.clone()).unwrap();
        assert_eq!(report.contributors().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert_eq!(serde_json::to_value(&report).unwrap(), value);

        value["co_authors"] = json!("bob");
        assert!(is_valid_report(&value));
    }

    #[test]
    fn test_errors_display_joined() {
        let errors = ValidationErrors(vec![
            ValidationError::Missing("id"),
            ValidationError::NotAString("type"),
        ]);
        assert_eq!(
            errors.to_string(),
            "missing required field `id`; field `type` must be a string"
        );
    }
}
