//! Error types for the readorder-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the readorder library.
#[derive(Error, Debug)]
pub enum ReadOrderError {
    /// The referenced input file does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A collaborator (OCR models, OCR support) is unavailable.
    #[error("{0}")]
    DependencyMissing(String),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Result aggregation error.
    #[error("aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed JSON input.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to interpret a page's content stream.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// OCR support was not compiled into this build.
    #[error("OCR support not available: {0}")]
    Unavailable(String),
}

/// Reasons a page could not be put into reading order.
///
/// These never escape a page: the page falls back to its raw text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderingError {
    /// The page has more blocks than the configured cap.
    #[error("page has {count} blocks, limit is {limit}")]
    TooManyBlocks { count: usize, limit: usize },

    /// Clustering panicked.
    #[error("row clustering panicked: {0}")]
    Panicked(String),
}

/// Errors from writing page results into their document slots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The slot index is past the declared page count.
    #[error("page slot {index} out of range for {len} pages")]
    OutOfRange { index: usize, len: usize },

    /// The slot was already written.
    #[error("page slot {0} already filled")]
    SlotFilled(usize),
}

/// Result type for the readorder library.
pub type Result<T> = std::result::Result<T, ReadOrderError>;
