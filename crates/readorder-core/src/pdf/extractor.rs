//! Positioned text extraction using pdf-extract.
//!
//! Documents are loaded with the lopdf version pdf-extract re-exports, so the
//! loaded type is the one its interpreter accepts.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use pdf_extract::Document;
use tracing::{debug, warn};

use super::collector::BlockCollector;
use super::Result;
use crate::error::{PdfError, ReadOrderError};
use crate::models::{PageInput, PdfConfig};
use crate::source::PageSource;

/// PDF block extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            config: PdfConfig::default(),
        }
    }

    /// Set processing configuration.
    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    /// Read and load a PDF file.
    pub fn open(path: &Path, config: PdfConfig) -> crate::Result<Self> {
        if !path.exists() {
            return Err(ReadOrderError::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;

        let mut extractor = Self::new().with_config(config);
        extractor.load(&data)?;
        Ok(extractor)
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Get the number of pages in the PDF.
    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Page numbers to process, honouring `max_pages`.
    fn page_numbers(&self, doc: &Document) -> Vec<u32> {
        let numbers = doc.get_pages().into_keys();
        match self.config.max_pages {
            0 => numbers.collect(),
            max => numbers.take(max).collect(),
        }
    }

    /// Extract the blocks of one page.
    pub fn extract_page(&self, number: u32) -> Result<PageInput> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;
        extract_page(doc, number, self.config.block_gap_ratio)
    }

    /// Extract every page. Pages that fail come back empty.
    pub fn extract_pages(&self) -> Result<Vec<PageInput>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let pages: Vec<PageInput> = self
            .page_numbers(doc)
            .into_iter()
            .map(|number| {
                extract_page(doc, number, self.config.block_gap_ratio).unwrap_or_else(|e| {
                    warn!("{}", e);
                    PageInput::failed(number)
                })
            })
            .collect();

        debug!(
            "Extracted {} blocks from {} pages",
            pages.iter().map(|p| p.items.len()).sum::<usize>(),
            pages.len()
        );
        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfExtractor {
    fn name(&self) -> &str {
        "pdf-extract"
    }

    fn pages(&self) -> crate::Result<Vec<PageInput>> {
        Ok(self.extract_pages()?)
    }
}

fn extract_page(doc: &Document, number: u32, gap_ratio: f64) -> Result<PageInput> {
    let mut collector = BlockCollector::new(gap_ratio);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::output_doc_page(doc, &mut collector, number)
    }));

    match outcome {
        Ok(Ok(())) => Ok(collector.into_page(number)),
        Ok(Err(e)) => Err(PdfError::TextExtraction {
            page: number,
            reason: format!("{:?}", e),
        }),
        Err(_) => Err(PdfError::TextExtraction {
            page: number,
            reason: "content stream interpreter panicked".to_string(),
        }),
    }
}
