//! Reading-order reconstruction.
//!
//! Raw items are normalized into blocks, clustered into rows, and joined into
//! text top to bottom, left to right. Each page is ordered independently: a
//! page that cannot be ordered keeps its raw text and never affects its
//! neighbours.

mod aggregate;
mod assemble;
mod normalize;
mod rows;

pub use aggregate::ResultAggregator;
pub use assemble::{assemble, assemble_row};
pub use normalize::{clean_text, normalize_items, parse_block};
pub use rows::{median_height, Row, RowClusterer};

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{AggregateError, OrderingError};
use crate::models::{DocumentResult, LayoutConfig, PageInput, PageResult, RawItem};

/// Orders pages of raw items into text.
#[derive(Debug, Clone, Default)]
pub struct ReadingOrder {
    clusterer: RowClusterer,
    parallel: bool,
}

impl ReadingOrder {
    /// Create an ordering stage around a clusterer. Pages are ordered sequentially.
    pub fn new(clusterer: RowClusterer) -> Self {
        Self {
            clusterer,
            parallel: false,
        }
    }

    /// Create an ordering stage from layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(RowClusterer::from_config(config)).with_parallel(config.parallel_pages)
    }

    /// Order pages on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Order one page's items. An empty string means nothing could be ordered.
    pub fn order_items(&self, items: &[RawItem]) -> Result<String, OrderingError> {
        let blocks = normalize_items(items);
        let rows = self.clusterer.cluster(blocks)?;
        Ok(assemble(&rows))
    }

    /// Order one page, falling back to its raw text on any failure.
    pub fn order_page(&self, page: &PageInput) -> PageResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.order_items(&page.items)))
            .unwrap_or_else(|payload| Err(OrderingError::Panicked(panic_message(payload))));

        match outcome {
            Ok(ordered_text) => {
                if ordered_text.is_empty() {
                    debug!("Page {} has no orderable blocks, using raw text", page.number);
                }
                PageResult::new(page.number, page.raw_text.clone(), ordered_text)
            }
            Err(e) => {
                warn!("Ordering failed for page {}: {}", page.number, e);
                PageResult::unordered(page.number, page.raw_text.clone())
            }
        }
    }

    /// Order every page of a document, keeping document order.
    pub fn order_document(&self, pages: &[PageInput]) -> Result<DocumentResult, AggregateError> {
        let results: Vec<(usize, PageResult)> = if self.parallel {
            pages
                .par_iter()
                .enumerate()
                .map(|(index, page)| (index, self.order_page(page)))
                .collect()
        } else {
            pages
                .iter()
                .enumerate()
                .map(|(index, page)| (index, self.order_page(page)))
                .collect()
        };

        let mut aggregator = ResultAggregator::with_page_count(pages.len());
        for (index, result) in results {
            aggregator.insert(index, result)?;
        }

        let document = aggregator.finish();
        debug!(
            "Ordered {}/{} pages",
            document.ordered_pages(),
            document.page_count()
        );
        Ok(document)
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
