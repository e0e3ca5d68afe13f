use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::output;
use crate::snapshot::Snapshot;

/// Read and parse a base station setup file
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read setup file {}", path.display()))?;

    let snapshot = Snapshot::from_json_str(&contents)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;

    info!(path = %path.display(), devices = snapshot.peripherals.len(), "Loaded setup file");
    Ok(snapshot)
}

/// Write the merged document; no retry, the caller reports the error as-is
pub fn save_snapshot(snapshot: &Snapshot, path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let contents = snapshot
        .to_json_string(pretty)
        .context("Failed to serialize setup to JSON")?;

    fs::write(path, contents)
        .with_context(|| format!("Failed to write output file {}", path.display()))?;

    info!(path = %path.display(), devices = snapshot.peripherals.len(), "Saved setup file");
    Ok(())
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.json`
pub fn default_output_file_name<Tz>(prefix: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{prefix}_{}.{}",
        now.format(output::TIMESTAMP_FORMAT),
        output::FILE_EXTENSION
    )
}

/// Where to write when no explicit output path was given
///
/// Uses `output_dir` when configured, otherwise the directory of the source file.
pub fn default_output_path(source: &Path, output_dir: Option<&Path>, file_name: &str) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_default_output_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            default_output_file_name("Spectera_Setup", &now),
            "Spectera_Setup_20240309_140507.json"
        );
    }

    #[test]
    fn test_default_output_path_prefers_configured_dir() {
        let source = Path::new("/shows/tour/primary.json");

        assert_eq!(
            default_output_path(source, None, "out.json"),
            PathBuf::from("/shows/tour/out.json")
        );
        assert_eq!(
            default_output_path(source, Some(Path::new("/exports")), "out.json"),
            PathBuf::from("/exports/out.json")
        );
        assert_eq!(
            default_output_path(Path::new("primary.json"), None, "out.json"),
            PathBuf::from("out.json")
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("setup.json");
        let snapshot: Snapshot = serde_json::from_value(json!({
            "pairedDevices": [ { "mtUid": "A", "name": "Drums" } ],
            "firmware": "2.1"
        }))
        .unwrap();

        save_snapshot(&snapshot, &path, false).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, snapshot);
        // Minified output has no newlines
        assert!(!fs::read_to_string(&path).unwrap().contains('\n'));
    }

    #[test]
    fn test_save_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");

        save_snapshot(&Snapshot::default(), &path, true).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains('\n'));
        let value: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["pairedDevices"], json!([]));
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_snapshot(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let err = load_snapshot(&broken).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON from"));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten with a file
        let err = save_snapshot(&Snapshot::default(), dir.path(), false).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to write output file"));
    }
}
