use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::aggregate::Outputs;

pub const INDEX_FILE: &str = "index.json";
pub const LEADERBOARD_FILE: &str = "leaderboard.json";

/// Create the output directory if it doesn't exist
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory at {}", dir.display()))?;
    }
    Ok(())
}

/// Write a JSON document atomically
///
/// Uses atomic-write-file so a reader never sees a half-written document.
/// Output is pretty-printed with a trailing newline.
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, document)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}

/// Write every bundle, then the index, then the leaderboard.
///
/// Returns the paths written, in that order. The first failure aborts.
pub fn write_outputs(dir: &Path, outputs: &Outputs) -> Result<Vec<PathBuf>> {
    ensure_output_dir(dir)?;

    let mut written = Vec::with_capacity(outputs.bundles.len() + 2);
    for bundle in &outputs.bundles {
        let path = dir.join(bundle.file_name());
        write_document(&path, bundle)?;
        written.push(path);
    }

    let index_path = dir.join(INDEX_FILE);
    write_document(&index_path, &outputs.index)?;
    written.push(index_path);

    let leaderboard_path = dir.join(LEADERBOARD_FILE);
    write_document(&leaderboard_path, &outputs.leaderboard)?;
    written.push(leaderboard_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_write_document_pretty_with_newline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.json");
        write_document(&path, &json!({ "a": [1, 2] })).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n"));
        assert!(content.contains("\n  \"a\": [\n    1,"));
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, json!({ "a": [1, 2] }));
    }

    #[test]
    fn test_write_document_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.json");
        fs::write(&path, "stale").unwrap();
        write_document(&path, &json!({ "fresh": true })).unwrap();
        let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!({ "fresh": true }));
    }

    #[test]
    fn test_ensure_output_dir_nested() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_unwritable_destination_is_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let result = write_document(&blocker.join("doc.json"), &json!({}));
        assert!(result.is_err());
    }
}
