mod schema;
pub mod urls;

pub use schema::Config;
pub use urls::{ProjectUrls, UrlTemplates};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "hivex.yaml";

/// Get the default config file path (./hivex.yaml)
pub fn get_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses `./hivex.yaml` and
///   falls back to defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.output_dir.as_os_str().is_empty() {
        errors.push("output_dir: must not be empty".to_string());
    }

    for (field, template) in config.urls.fields() {
        match urls::placeholders(template) {
            Ok(names) => {
                for name in names {
                    if !urls::PLACEHOLDERS.contains(&name) {
                        errors.push(format!(
                            "urls.{}: unknown placeholder '{{{}}}' (expected {{branch}} or {{slug}})",
                            field, name
                        ));
                    }
                }
            }
            Err(e) => errors.push(format!("urls.{}: invalid template '{}' - {}", field, template, e)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
