//! OCR engine wrapper around `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::{OcrConfig, OcrLine};

use super::OcrResult;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct OcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl OcrEngine {
    /// Create an engine from model files in a directory.
    pub fn from_dir(model_dir: &Path, config: OcrConfig) -> Result<Self, OcrError> {
        let [det_path, rec_path, dict_path] = config.model_files(model_dir);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine, config })
    }

    /// Recognize text lines in an image, in the engine's own order.
    pub fn process(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        info!("Processing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let lines: Vec<OcrLine> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                OcrLine {
                    text,
                    confidence: r.confidence,
                    polygon: Some(polygon_points(&r.bounding_box)),
                }
            })
            .collect();

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!("OCR complete: {} lines in {}ms", lines.len(), processing_time_ms);

        Ok(OcrResult::new(lines, processing_time_ms, (width, height)))
    }
}

/// Exterior points of a `Polygon<f64>`, without the closing duplicate point.
fn polygon_points(polygon: &pure_onnx_ocr::Polygon<f64>) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = polygon
        .exterior()
        .coords()
        .map(|coord| [coord.x, coord.y])
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}
