use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Analyzer configuration
// ---------------------------------------------------------------------------

/// Tunables for the import pipeline.
///
/// Every field has a default, so a config file only needs to name the values
/// it changes:
///
/// ```json
/// { "extension": "dat", "sort_by_energy": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Measurement file extension, without the leading dot. Compared exactly.
    pub extension: String,
    /// Sort the aggregated spectrum by ascending x. When disabled the spectrum
    /// keeps the order in which x values were first seen, and range slicing
    /// follows that order instead of the numeric range.
    pub sort_by_energy: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            sort_by_energy: true,
        }
    }
}

impl AnalyzerConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text).context("parsing config JSON")?;
        log::debug!("Loaded config {config:?} from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{ "extension": "dat" }"#).unwrap();
        assert_eq!(config.extension, "dat");
        assert!(config.sort_by_energy);
    }

    #[test]
    fn reads_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyzer.json");
        std::fs::write(&path, r#"{ "sort_by_energy": false }"#).unwrap();

        let config = AnalyzerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.extension, "txt");
        assert!(!config.sort_by_energy);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AnalyzerConfig::from_json_file(&dir.path().join("nope.json")).is_err());
    }
}
