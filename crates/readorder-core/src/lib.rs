//! Core library for reading-order text extraction.
//!
//! This crate provides:
//! - Block normalization of positioned text from PDFs, OCR and JSON dumps
//! - Row clustering with a height-adaptive tolerance
//! - Reading-order assembly (rows top to bottom, blocks left to right)
//! - Per-page result aggregation with raw-text fallback

pub mod dump;
pub mod error;
pub mod layout;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod source;

pub use dump::BlockDump;
pub use error::{OcrError, OrderingError, PdfError, ReadOrderError, Result};
pub use layout::{ReadingOrder, ResultAggregator, Row, RowClusterer};
pub use models::{
    Block, DocumentResult, OcrLine, PageInput, PageResult, RawBlock, RawItem, ReadOrderConfig,
};
pub use ocr::{recognize_file, OcrResult};
#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
pub use pdf::PdfExtractor;
pub use source::PageSource;
