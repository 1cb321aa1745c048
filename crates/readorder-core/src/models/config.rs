//! Configuration structures for the extraction and ordering pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ReadOrderError;

/// Main configuration for the readorder pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOrderConfig {
    /// Row clustering configuration.
    pub layout: LayoutConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,
}

/// Row clustering and reading-order configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Smallest vertical gap still treated as the same row.
    pub min_row_tolerance: f64,

    /// Row tolerance as a fraction of the median block height.
    pub row_tolerance_ratio: f64,

    /// Maximum blocks on one page before falling back to raw text (0 = unlimited).
    pub max_blocks_per_page: usize,

    /// Order pages on the rayon thread pool.
    pub parallel_pages: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_row_tolerance: 6.0,
            row_tolerance_ratio: 0.7,
            max_blocks_per_page: 0,
            parallel_pages: true,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Horizontal gap, in multiples of the font size, that splits a text run
    /// into separate blocks.
    pub block_gap_ratio: f64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            block_gap_ratio: 1.5,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files (`None` uses the platform data dir).
    pub model_dir: Option<PathBuf>,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of replacing them with spaces.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Paths of the detection model, recognition model and dictionary inside `dir`.
    pub fn model_files(&self, dir: &Path) -> [PathBuf; 3] {
        [
            dir.join(&self.detection_model),
            dir.join(&self.recognition_model),
            dir.join(&self.dictionary),
        ]
    }
}

impl ReadOrderConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ReadOrderError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ReadOrderError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ReadOrderError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_tolerances() {
        let config = ReadOrderConfig::default();
        assert_eq!(config.layout.min_row_tolerance, 6.0);
        assert_eq!(config.layout.row_tolerance_ratio, 0.7);
        assert_eq!(config.layout.max_blocks_per_page, 0);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ReadOrderConfig =
            serde_json::from_str(r#"{"layout": {"min_row_tolerance": 4.0}}"#).unwrap();
        assert_eq!(config.layout.min_row_tolerance, 4.0);
        assert_eq!(config.layout.row_tolerance_ratio, 0.7);
        assert_eq!(config.ocr, OcrConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ReadOrderConfig::default();
        config.pdf.max_pages = 3;
        config.ocr.keep_unk = true;
        config.save(&path).unwrap();

        assert_eq!(ReadOrderConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ReadOrderConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ReadOrderError::Config(ref msg) if msg.contains("broken.json")));
    }
}
