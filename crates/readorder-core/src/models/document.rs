//! Per-page and per-document extraction results.

use serde::{Deserialize, Serialize};

/// Ordered and raw text for one page or image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed).
    pub number: u32,
    /// Text in the extractor's native order.
    pub raw_text: String,
    /// Text in reconstructed reading order (may be empty).
    pub ordered_text: String,
    /// True iff `ordered_text` is non-empty.
    pub ordered: bool,
}

impl PageResult {
    /// Create a page result; `ordered` follows from `ordered_text`.
    pub fn new(number: u32, raw_text: impl Into<String>, ordered_text: impl Into<String>) -> Self {
        let ordered_text = ordered_text.into();
        Self {
            number,
            raw_text: raw_text.into(),
            ordered: !ordered_text.is_empty(),
            ordered_text,
        }
    }

    /// A page that could not be ordered and only carries raw text.
    pub fn unordered(number: u32, raw_text: impl Into<String>) -> Self {
        Self::new(number, raw_text, String::new())
    }

    /// The text to emit: ordered if available, otherwise raw.
    pub fn final_text(&self) -> &str {
        if self.ordered {
            &self.ordered_text
        } else {
            &self.raw_text
        }
    }
}

/// Page results for a whole document, in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pages: Vec<PageResult>,
}

impl DocumentResult {
    /// Wrap pages that are already in document order.
    pub fn new(pages: Vec<PageResult>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[PageResult] {
        &self.pages
    }

    /// Number of pages processed, including pages that fell back to raw text.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages whose text came from row ordering.
    pub fn ordered_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.ordered).count()
    }

    /// Whether row ordering was used for at least one page.
    pub fn ordered(&self) -> bool {
        self.pages.iter().any(|p| p.ordered)
    }

    /// Final text of every page, joined by newlines. Empty pages are skipped.
    pub fn text(&self) -> String {
        join_non_empty(self.pages.iter().map(PageResult::final_text))
    }

    /// Raw text of every page, joined by newlines. Empty pages are skipped.
    pub fn raw_text(&self) -> String {
        join_non_empty(self.pages.iter().map(|p| p.raw_text.as_str()))
    }
}

fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.filter(|t| !t.is_empty()).collect::<Vec<_>>().join("\n")
}
