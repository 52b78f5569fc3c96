use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings for one batch run. Every field has a default, so a config file
/// only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Zero-based position of the x column after empty columns are dropped.
    pub x_column: usize,
    /// Zero-based position of the y column after empty columns are dropped.
    pub y_column: usize,
    /// Encoding tried first for every file.
    pub encoding: String,
    /// Encoding tried once if the primary one cannot decode a file.
    pub fallback_encoding: String,
    /// File extension (without the dot) that selects input files.
    pub extension: String,
    /// Name of the report written into the input directory.
    pub report_name: String,
    /// Text written in place of a period for files that failed.
    pub error_marker: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            x_column: 3,
            y_column: 4,
            encoding: "shift_jis".to_string(),
            fallback_encoding: "utf-8".to_string(),
            extension: "csv".to_string(),
            report_name: "periods.xlsx".to_string(),
            error_marker: "Error".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Whether `file_name` carries the configured extension.
    ///
    /// The match is a plain suffix test, so `data.CSV` is not picked up by
    /// the default `csv`.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        file_name.ends_with(&format!(".{}", self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_fourth_and_fifth_columns() {
        let cfg = AnalysisConfig::default();
        assert_eq!((cfg.x_column, cfg.y_column), (3, 4));
        assert_eq!(cfg.encoding, "shift_jis");
        assert_eq!(cfg.fallback_encoding, "utf-8");
        assert_eq!(cfg.report_name, "periods.xlsx");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str(r#"{ "y_column": 1, "encoding": "utf-8" }"#).unwrap();
        assert_eq!(cfg.y_column, 1);
        assert_eq!(cfg.encoding, "utf-8");
        assert_eq!(cfg.x_column, 3);
        assert_eq!(cfg.error_marker, "Error");
    }

    #[test]
    fn extension_is_a_suffix_match() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.matches_extension("a.csv"));
        assert!(!cfg.matches_extension("c.txt"));
        assert!(!cfg.matches_extension("csv"));
        assert!(!cfg.matches_extension("b.CSV"));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("period.json");
        std::fs::write(&path, r#"{ "report_name": "out.xlsx" }"#).unwrap();
        let cfg = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.report_name, "out.xlsx");
    }
}
