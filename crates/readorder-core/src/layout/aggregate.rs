//! Collect page results into document order.

use crate::error::AggregateError;
use crate::models::{DocumentResult, PageResult};

/// Pre-sized, write-once page slots.
///
/// Pages may be finished in any order; the document always comes out in slot
/// order.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    slots: Vec<Option<PageResult>>,
}

impl ResultAggregator {
    /// Create an aggregator for `page_count` pages.
    pub fn with_page_count(page_count: usize) -> Self {
        Self {
            slots: vec![None; page_count],
        }
    }

    /// Store the result for the page at `index` (0-based).
    pub fn insert(&mut self, index: usize, page: PageResult) -> Result<(), AggregateError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AggregateError::OutOfRange { index, len })?;

        if slot.is_some() {
            return Err(AggregateError::SlotFilled(index));
        }
        *slot = Some(page);
        Ok(())
    }

    /// Build the document. Slots never written become empty, unordered pages.
    pub fn finish(self) -> DocumentResult {
        let pages = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.unwrap_or_else(|| PageResult::unordered(index as u32 + 1, "")))
            .collect();
        DocumentResult::new(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_out_of_order_inserts_keep_page_order() {
        let mut aggregator = ResultAggregator::with_page_count(3);
        aggregator.insert(2, PageResult::new(3, "", "third")).unwrap();
        aggregator.insert(0, PageResult::new(1, "", "first")).unwrap();
        aggregator.insert(1, PageResult::new(2, "", "second")).unwrap();

        let doc = aggregator.finish();
        assert_eq!(doc.text(), "first\nsecond\nthird");
    }

    #[test]
    fn test_slot_written_once() {
        let mut aggregator = ResultAggregator::with_page_count(1);
        aggregator.insert(0, PageResult::unordered(1, "a")).unwrap();
        assert_eq!(
            aggregator.insert(0, PageResult::unordered(1, "b")),
            Err(AggregateError::SlotFilled(0))
        );
    }

    #[test]
    fn test_out_of_range() {
        let mut aggregator = ResultAggregator::with_page_count(2);
        assert_eq!(
            aggregator.insert(2, PageResult::unordered(3, "")),
            Err(AggregateError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_missing_slots_become_empty_pages() {
        let mut aggregator = ResultAggregator::with_page_count(2);
        aggregator.insert(1, PageResult::unordered(2, "raw")).unwrap();

        let doc = aggregator.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[0], PageResult::unordered(1, ""));
        assert_eq!(doc.text(), "raw");
    }
}
