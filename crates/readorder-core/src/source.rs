//! Extraction sources feeding the ordering stage.

use crate::layout::ReadingOrder;
use crate::models::{DocumentResult, PageInput};
use crate::Result;

/// Anything that yields positioned text per page.
pub trait PageSource {
    /// Identifier reported as the extractor in results.
    fn name(&self) -> &str;

    /// Extract every page, in document order.
    ///
    /// A page whose extraction fails is returned empty rather than failing the
    /// whole call.
    fn pages(&self) -> Result<Vec<PageInput>>;

    /// Extract and order every page.
    fn read(&self, order: &ReadingOrder) -> Result<DocumentResult> {
        let pages = self.pages()?;
        Ok(order.order_document(&pages)?)
    }
}
