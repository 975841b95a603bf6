//! JSON file loading for the tap
//!
//! Every input the tap reads (connector config, prior state, catalog) is a
//! JSON document. This crate loads them from explicit paths, or from the
//! shared tap config directory (~/.config/tap-woocommerce/) when no path
//! is given on the command line.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the tap's directory under the platform config dir
const APP_DIR: &str = "tap-woocommerce";

/// Get the tap config directory (~/.config/tap-woocommerce/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Get the path to a file within the tap config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Check if a file exists in the tap config directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

/// Load and parse a JSON file from the tap config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// Load a JSON file if a path was given, otherwise fall back to `T::default()`
///
/// Used for optional inputs such as the prior state file.
pub fn load_optional_json_file<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => load_json_file(path),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_config_dir() {
        let dir = config_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with("tap-woocommerce"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path("config.json");
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("tap-woocommerce/config.json"));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "orders"}}"#).unwrap();

        let sample: Sample = load_json_file(file.path()).unwrap();
        assert_eq!(sample.name, "orders");
    }

    #[test]
    fn test_load_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_json_file::<Sample>(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON file"));
    }

    #[test]
    fn test_load_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_json_file::<Sample>(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_optional_json_file_none() {
        let sample: Sample = load_optional_json_file(None).unwrap();
        assert_eq!(sample, Sample::default());
    }
}
