//! Row clustering with a height-adaptive vertical tolerance.
//!
//! Blocks are scanned top to bottom. A block joins the current row unless its
//! top edge lies more than `row_tol` below the lowest bottom edge seen in that
//! row, where `row_tol = max(min_tolerance, median_height * height_ratio)`.

use tracing::debug;

use crate::error::OrderingError;
use crate::models::{Block, LayoutConfig};

/// Blocks judged to lie on one visual line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Blocks in scan order; sorted by `x0` only when assembled.
    pub blocks: Vec<Block>,
}

impl Row {
    /// Blocks ordered left to right. Equal `x0` keeps scan order.
    pub fn sorted_blocks(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.blocks.iter().collect();
        blocks.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        blocks
    }
}

/// Groups blocks into rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowClusterer {
    min_tolerance: f64,
    height_ratio: f64,
    max_blocks: Option<usize>,
}

impl RowClusterer {
    /// Create a clusterer with the default tolerance (6.0, 0.7) and no block cap.
    pub fn new() -> Self {
        Self {
            min_tolerance: 6.0,
            height_ratio: 0.7,
            max_blocks: None,
        }
    }

    /// Create a clusterer from layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new()
            .with_min_tolerance(config.min_row_tolerance)
            .with_height_ratio(config.row_tolerance_ratio)
            .with_max_blocks((config.max_blocks_per_page > 0).then_some(config.max_blocks_per_page))
    }

    /// Set the absolute lower bound of the row tolerance.
    pub fn with_min_tolerance(mut self, min_tolerance: f64) -> Self {
        self.min_tolerance = min_tolerance;
        self
    }

    /// Set the tolerance as a fraction of the median block height.
    pub fn with_height_ratio(mut self, height_ratio: f64) -> Self {
        self.height_ratio = height_ratio;
        self
    }

    /// Refuse to cluster pages with more blocks than this.
    pub fn with_max_blocks(mut self, max_blocks: Option<usize>) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    /// Tolerance for a page whose median block height is `median_height`.
    pub fn tolerance_for(&self, median_height: f64) -> f64 {
        self.min_tolerance.max(median_height * self.height_ratio)
    }

    /// Partition blocks into rows, emitted top to bottom.
    ///
    /// Every block ends up in exactly one row. Rows are not sorted internally.
    pub fn cluster(&self, mut blocks: Vec<Block>) -> Result<Vec<Row>, OrderingError> {
        if let Some(limit) = self.max_blocks {
            if blocks.len() > limit {
                return Err(OrderingError::TooManyBlocks {
                    count: blocks.len(),
                    limit,
                });
            }
        }

        let Some(median_h) = median_height(&blocks) else {
            return Ok(Vec::new());
        };
        let row_tol = self.tolerance_for(median_h);

        blocks.sort_by(|a, b| a.y0.total_cmp(&b.y0).then(a.x0.total_cmp(&b.x0)));

        let block_count = blocks.len();
        let mut rows = Vec::new();
        let mut current: Vec<Block> = Vec::new();
        let mut current_max_y = f64::NEG_INFINITY;

        for block in blocks {
            if !current.is_empty() && block.y0 > current_max_y + row_tol {
                rows.push(Row {
                    blocks: std::mem::take(&mut current),
                });
                current_max_y = block.y1;
            } else {
                current_max_y = current_max_y.max(block.y1);
            }
            current.push(block);
        }
        if !current.is_empty() {
            rows.push(Row { blocks: current });
        }

        debug!(
            "Clustered {} blocks into {} rows (median height {:.2}, tolerance {:.2})",
            block_count,
            rows.len(),
            median_h,
            row_tol
        );

        Ok(rows)
    }
}

impl Default for RowClusterer {
    fn default() -> Self {
        Self::new()
    }
}

/// Median block height; the mean of the two middle values for even counts.
pub fn median_height(blocks: &[Block]) -> Option<f64> {
    if blocks.is_empty() {
        return None;
    }

    let mut heights: Vec<f64> = blocks.iter().map(|b| b.height).collect();
    heights.sort_by(f64::total_cmp);

    let mid = heights.len() / 2;
    if heights.len() % 2 == 1 {
        Some(heights[mid])
    } else {
        Some((heights[mid - 1] + heights[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(x0: f64, y0: f64, x1: f64, y1: f64, text: &str) -> Block {
        Block {
            x0,
            y0,
            x1,
            y1,
            text: text.to_string(),
            height: (y1 - y0).max(1.0),
        }
    }

    fn row_texts(rows: &[Row]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.blocks.iter().map(|b| b.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input_gives_no_rows() {
        let rows = RowClusterer::new().cluster(Vec::new()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_single_block_forms_one_row() {
        let rows = RowClusterer::new()
            .cluster(vec![block(0.0, 0.0, 100.0, 10.0, "Hello")])
            .unwrap();
        assert_eq!(row_texts(&rows), vec![vec!["Hello"]]);
    }

    #[test]
    fn test_form_layout_splits_into_two_rows() {
        let blocks = vec![
            block(0.0, 20.0, 50.0, 30.0, "Age:"),
            block(60.0, 0.0, 120.0, 10.0, "Alice"),
            block(60.0, 20.0, 90.0, 30.0, "30"),
            block(0.0, 0.0, 50.0, 10.0, "Name:"),
        ];
        let rows = RowClusterer::new().cluster(blocks).unwrap();
        assert_eq!(row_texts(&rows), vec![vec!["Name:", "Alice"], vec!["Age:", "30"]]);
    }

    #[test]
    fn test_close_lines_merge_within_tolerance() {
        // Median height 10 gives tolerance 7; the 5 unit gap stays in one row.
        let blocks = vec![
            block(0.0, 0.0, 40.0, 10.0, "upper"),
            block(50.0, 15.0, 90.0, 25.0, "lower"),
        ];
        let clusterer = RowClusterer::new();
        assert_eq!(clusterer.tolerance_for(10.0), 7.0);

        let rows = clusterer.cluster(blocks).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_gap_beyond_tolerance_splits() {
        let blocks = vec![
            block(0.0, 0.0, 40.0, 10.0, "upper"),
            block(0.0, 17.5, 40.0, 27.5, "lower"),
        ];
        let rows = RowClusterer::new().cluster(blocks).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_running_max_extends_row() {
        // A tall block pushes the row bottom down so a later block still joins.
        let blocks = vec![
            block(0.0, 0.0, 10.0, 10.0, "a"),
            block(20.0, 2.0, 30.0, 40.0, "tall"),
            block(40.0, 42.0, 50.0, 52.0, "b"),
        ];
        let rows = RowClusterer::new().cluster(blocks).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_median_height() {
        let odd = vec![
            block(0.0, 0.0, 1.0, 4.0, "a"),
            block(0.0, 0.0, 1.0, 10.0, "b"),
            block(0.0, 0.0, 1.0, 2.0, "c"),
        ];
        let even = vec![
            block(0.0, 0.0, 1.0, 4.0, "a"),
            block(0.0, 0.0, 1.0, 10.0, "b"),
        ];
        assert_eq!(median_height(&odd), Some(4.0));
        assert_eq!(median_height(&even), Some(7.0));
        assert_eq!(median_height(&[]), None);
    }

    #[test]
    fn test_minimum_tolerance_applies_to_small_text() {
        let clusterer = RowClusterer::new();
        assert_eq!(clusterer.tolerance_for(2.0), 6.0);
        assert_eq!(clusterer.tolerance_for(20.0), 14.0);
    }

    #[test]
    fn test_custom_tolerance_parameters() {
        let clusterer = RowClusterer::new().with_min_tolerance(1.0).with_height_ratio(0.1);
        let blocks = vec![
            block(0.0, 0.0, 40.0, 10.0, "upper"),
            block(50.0, 15.0, 90.0, 25.0, "lower"),
        ];
        assert_eq!(clusterer.cluster(blocks).unwrap().len(), 2);
    }

    #[test]
    fn test_tolerance_is_monotonic_in_height() {
        let clusterer = RowClusterer::new();
        let mut previous = 0.0;
        for h in [0.5, 1.0, 5.0, 8.57, 10.0, 25.0, 100.0] {
            let tol = clusterer.tolerance_for(h);
            assert!(tol >= previous);
            previous = tol;
        }
    }

    #[test]
    fn test_scaling_does_not_split_merged_rows() {
        let base = vec![
            block(0.0, 0.0, 40.0, 10.0, "a"),
            block(50.0, 15.0, 90.0, 25.0, "b"),
            block(0.0, 40.0, 40.0, 50.0, "c"),
        ];
        let clusterer = RowClusterer::new();
        let base_rows = clusterer.cluster(base.clone()).unwrap().len();

        for k in [2.0, 3.0, 10.0] {
            let scaled: Vec<Block> = base
                .iter()
                .map(|b| block(b.x0 * k, b.y0 * k, b.x1 * k, b.y1 * k, &b.text))
                .collect();
            let rows = clusterer.cluster(scaled).unwrap().len();
            assert!(rows <= base_rows, "scale {} produced {} rows", k, rows);
        }
    }

    #[test]
    fn test_every_block_lands_in_exactly_one_row() {
        let blocks: Vec<Block> = (0..40)
            .map(|i| {
                let x = ((i * 37) % 11) as f64 * 20.0;
                let y = ((i * 13) % 7) as f64 * 9.0;
                block(x, y, x + 15.0, y + 8.0 + (i % 3) as f64, &format!("b{}", i))
            })
            .collect();

        let rows = RowClusterer::new().cluster(blocks.clone()).unwrap();
        assert!(rows.iter().all(|r| !r.blocks.is_empty()));

        let mut seen: Vec<String> = rows
            .iter()
            .flat_map(|r| r.blocks.iter().map(|b| b.text.clone()))
            .collect();
        let mut expected: Vec<String> = blocks.into_iter().map(|b| b.text).collect();
        seen.sort();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_block_cap() {
        let clusterer = RowClusterer::new().with_max_blocks(Some(1));
        let err = clusterer
            .cluster(vec![
                block(0.0, 0.0, 1.0, 1.0, "a"),
                block(0.0, 5.0, 1.0, 6.0, "b"),
            ])
            .unwrap_err();
        assert_eq!(err, OrderingError::TooManyBlocks { count: 2, limit: 1 });
    }

    #[test]
    fn test_from_config_zero_cap_is_unlimited() {
        let clusterer = RowClusterer::from_config(&LayoutConfig::default());
        assert_eq!(clusterer, RowClusterer::new());
    }

    #[test]
    fn test_sorted_blocks_is_stable_on_ties() {
        let row = Row {
            blocks: vec![
                block(5.0, 0.0, 6.0, 1.0, "five"),
                block(1.0, 0.0, 2.0, 1.0, "one-a"),
                block(3.0, 0.0, 4.0, 1.0, "three"),
                block(1.0, 0.0, 2.0, 1.0, "one-b"),
            ],
        };
        let texts: Vec<&str> = row.sorted_blocks().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["one-a", "one-b", "three", "five"]);
    }
}
