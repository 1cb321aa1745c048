//! OCR pipeline: image in, recognized lines out.
//!
//! The engine is compiled in with the `ocr` feature. Without it, or without
//! model files on disk, [`recognize_file`] reports a missing dependency.

#[cfg(feature = "ocr")]
mod engine;

#[cfg(feature = "ocr")]
pub use engine::OcrEngine;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReadOrderError;
use crate::layout::ReadingOrder;
use crate::models::{OcrConfig, OcrLine, PageInput, PageResult, RawItem};

/// Result of OCR processing on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized lines, in engine order.
    pub lines: Vec<OcrLine>,

    /// Line texts joined with newlines, in engine order.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from recognized lines.
    pub fn new(lines: Vec<OcrLine>, processing_time_ms: u64, image_size: (u32, u32)) -> Self {
        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            lines,
            text,
            processing_time_ms,
            image_size,
        }
    }

    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::new(Vec::new(), 0, (width, height))
    }

    /// The image as a single page: engine text as raw text, line boxes as items.
    pub fn to_page(&self) -> PageInput {
        let items = self.lines.iter().cloned().map(RawItem::Line).collect();
        PageInput::new(1, self.text.clone(), items)
    }

    /// Re-order lines by their boxes.
    pub fn order(&self, order: &ReadingOrder) -> PageResult {
        order.order_page(&self.to_page())
    }
}

/// Files that must exist in `model_dir` before the engine can load.
pub fn missing_models(model_dir: &Path, config: &OcrConfig) -> Vec<String> {
    config
        .model_files(model_dir)
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect()
}

/// Run OCR over an image file.
pub fn recognize_file(
    image_path: &Path,
    model_dir: &Path,
    config: &OcrConfig,
) -> crate::Result<OcrResult> {
    if !image_path.exists() {
        return Err(ReadOrderError::InputNotFound(image_path.to_path_buf()));
    }

    let missing = missing_models(model_dir, config);
    if !missing.is_empty() {
        return Err(ReadOrderError::DependencyMissing(format!(
            "OCR models not available: missing {}. Place {}, {} and {} in the model directory or pass --model-dir.",
            missing.join(", "),
            config.detection_model,
            config.recognition_model,
            config.dictionary
        )));
    }

    run_engine(image_path, model_dir, config)
}

#[cfg(feature = "ocr")]
fn run_engine(image_path: &Path, model_dir: &Path, config: &OcrConfig) -> crate::Result<OcrResult> {
    let image = image::open(image_path)?;
    let engine = OcrEngine::from_dir(model_dir, config.clone())?;
    Ok(engine.process(&image)?)
}

#[cfg(not(feature = "ocr"))]
fn run_engine(_image_path: &Path, _model_dir: &Path, _config: &OcrConfig) -> crate::Result<OcrResult> {
    Err(ReadOrderError::DependencyMissing(
        "OCR engine not available. Rebuild readorder with the `ocr` feature.".to_string(),
    ))
}
