use serde::{Deserialize, Serialize};

pub const PLACEHOLDERS: [&str; 2] = ["branch", "slug"];

/// Templates for the three links published per project in `index.json`.
///
/// `{branch}` and `{slug}` are replaced with the project's values.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UrlTemplates {
    pub github_branch: String,
    pub readme_raw: String,
    pub results: String,
}

impl Default for UrlTemplates {
    fn default() -> Self {
        Self {
            github_branch: "https://github.com/hivex-community/hivex/tree/{branch}".to_string(),
            readme_raw:
                "https://raw.githubusercontent.com/hivex-community/hivex/{branch}/project/{slug}/README.md"
                    .to_string(),
            results: "results-{slug}.json".to_string(),
        }
    }
}

/// Resolved links for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUrls {
    pub github_branch_url: String,
    pub readme_raw_url: String,
    pub results_url: String,
}

impl UrlTemplates {
    pub fn resolve(&self, branch: &str, slug: &str) -> ProjectUrls {
        ProjectUrls {
            github_branch_url: render(&self.github_branch, branch, slug),
            readme_raw_url: render(&self.readme_raw, branch, slug),
            results_url: render(&self.results, branch, slug),
        }
    }

    /// `(field name, template)` pairs, for validation messages.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("github_branch", self.github_branch.as_str()),
            ("readme_raw", self.readme_raw.as_str()),
            ("results", self.results.as_str()),
        ]
    }
}

pub fn render(template: &str, branch: &str, slug: &str) -> String {
    template.replace("{branch}", branch).replace("{slug}", slug)
}

/// Names of every `{placeholder}` in `template`, or a description of the
/// first unbalanced brace.
pub fn placeholders(template: &str) -> Result<Vec<&str>, String> {
    let mut names = Vec::new();
    let mut rest = template;
    let mut offset = 0;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(format!("unmatched '}}' at byte {}", offset + open));
        }
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']) else {
            return Err(format!("unclosed '{{' at byte {}", offset + open));
        };
        if after[close..].starts_with('{') {
            return Err(format!("unclosed '{{' at byte {}", offset + open));
        }
        names.push(&after[..close]);
        let consumed = open + 1 + close + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let urls = UrlTemplates::default().resolve("main", "demo");
        assert_eq!(
            urls.github_branch_url,
            "https://github.com/hivex-community/hivex/tree/main"
        );
        assert_eq!(
            urls.readme_raw_url,
            "https://raw.githubusercontent.com/hivex-community/hivex/main/project/demo/README.md"
        );
        assert_eq!(urls.results_url, "results-demo.json");
    }

    #[test]
    fn test_render_repeated_placeholders() {
        assert_eq!(render("{slug}/{branch}/{slug}", "dev", "x"), "x/dev/x");
    }

    #[test]
    fn test_placeholders_found() {
        assert_eq!(
            placeholders("https://h/{branch}/p/{slug}").unwrap(),
            vec!["branch", "slug"]
        );
        assert!(placeholders("plain").unwrap().is_empty());
    }

    #[test]
    fn test_placeholders_unbalanced() {
        assert!(placeholders("https://h/{branch").unwrap_err().contains("unclosed"));
        assert!(placeholders("https://h/branch}").unwrap_err().contains("unmatched"));
        assert!(placeholders("{a{b}").unwrap_err().contains("unclosed"));
    }
}
