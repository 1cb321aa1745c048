//! Block normalization: raw extractor items to clean [`Block`]s.

use tracing::{debug, trace};

use crate::models::{Block, OcrLine, RawBlock, RawItem};

/// Convert one raw item into a block, or `None` if it is unusable.
///
/// Items are skipped when a coordinate is missing or not a finite number, or
/// when the text is empty after cleaning.
pub fn parse_block(item: &RawItem) -> Option<Block> {
    match item {
        RawItem::Block(raw) => raw.normalize(),
        RawItem::Line(line) => from_ocr_line(line),
    }
}

/// Normalize every item on a page, dropping the unusable ones.
pub fn normalize_items<'a>(items: impl IntoIterator<Item = &'a RawItem>) -> Vec<Block> {
    let mut skipped = 0usize;
    let blocks: Vec<Block> = items
        .into_iter()
        .filter_map(|item| {
            let block = parse_block(item);
            if block.is_none() {
                skipped += 1;
            }
            block
        })
        .collect();

    if skipped > 0 {
        debug!("Normalized {} blocks, skipped {} items", blocks.len(), skipped);
    }
    blocks
}

/// `\r` becomes `\n`, then surrounding whitespace is trimmed.
pub fn clean_text(text: &str) -> String {
    text.replace('\r', "\n").trim().to_string()
}

impl RawBlock {
    /// Convert to a block, or `None` on malformed geometry or empty text.
    pub fn normalize(&self) -> Option<Block> {
        let coords = (
            self.x0.as_f64(),
            self.y0.as_f64(),
            self.x1.as_f64(),
            self.y1.as_f64(),
        );
        let (Some(x0), Some(y0), Some(x1), Some(y1)) = coords else {
            trace!("Skipping block with malformed geometry: {:?}", self);
            return None;
        };

        build(x0, y0, x1, y1, self.text.as_deref().unwrap_or_default())
    }
}

fn from_ocr_line(line: &OcrLine) -> Option<Block> {
    let Some((x0, y0, x1, y1)) = line.rect() else {
        trace!("Skipping OCR line without box: {:?}", line.text);
        return None;
    };
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        trace!("Skipping OCR line with non-finite box: {:?}", line.text);
        return None;
    }

    build(x0, y0, x1, y1, &line.text)
}

fn build(x0: f64, y0: f64, x1: f64, y1: f64, text: &str) -> Option<Block> {
    let text = clean_text(text);
    if text.is_empty() {
        return None;
    }

    Some(Block {
        x0,
        y0,
        x1,
        y1,
        text,
        height: (y1 - y0).max(1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_block_cleans_text() {
        let item = RawItem::Block(RawBlock::new(0.0, 0.0, 50.0, 10.0, "  Name:\r\n "));
        let block = parse_block(&item).unwrap();
        assert_eq!(block.text, "Name:");
        assert_eq!(block.height, 10.0);
    }

    #[test]
    fn test_parse_block_keeps_inner_carriage_returns_as_newlines() {
        let item = RawItem::Block(RawBlock::new(0.0, 0.0, 50.0, 10.0, "a\rb"));
        assert_eq!(parse_block(&item).unwrap().text, "a\nb");
    }

    #[test]
    fn test_height_is_floored() {
        let flat = RawItem::Block(RawBlock::new(0.0, 5.0, 10.0, 5.0, "x"));
        let inverted = RawItem::Block(RawBlock::new(0.0, 9.0, 10.0, 2.0, "y"));
        assert_eq!(parse_block(&flat).unwrap().height, 1.0);
        assert_eq!(parse_block(&inverted).unwrap().height, 1.0);
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let blank = RawItem::Block(RawBlock::new(0.0, 0.0, 10.0, 10.0, " \r\n\t"));
        let missing = RawItem::Block(RawBlock {
            text: None,
            ..RawBlock::new(0.0, 0.0, 10.0, 10.0, "")
        });
        assert!(parse_block(&blank).is_none());
        assert!(parse_block(&missing).is_none());
    }

    #[test]
    fn test_malformed_geometry_is_skipped() {
        let mut raw = RawBlock::new(0.0, 0.0, 10.0, 10.0, "text");
        raw.y1 = Coordinate::Text("bottom".into());
        assert!(parse_block(&RawItem::Block(raw.clone())).is_none());

        raw.y1 = Coordinate::Missing;
        assert!(parse_block(&RawItem::Block(raw)).is_none());
    }

    #[test]
    fn test_ocr_line_uses_bounding_rect() {
        let line = OcrLine {
            text: " Total ".into(),
            confidence: 0.8,
            polygon: Some(vec![[10.0, 20.0], [60.0, 20.0], [60.0, 32.0], [10.0, 32.0]]),
        };
        let block = parse_block(&RawItem::Line(line)).unwrap();
        assert_eq!((block.x0, block.y0, block.x1, block.y1), (10.0, 20.0, 60.0, 32.0));
        assert_eq!(block.text, "Total");
    }

    #[test]
    fn test_normalization_drops_exactly_the_bad_items() {
        let items = vec![
            RawItem::Block(RawBlock::new(0.0, 0.0, 10.0, 10.0, "keep-1")),
            RawItem::Block(RawBlock::new(0.0, 0.0, 10.0, 10.0, "   ")),
            RawItem::Block(RawBlock::default()),
            RawItem::Line(OcrLine {
                text: "no box".into(),
                confidence: 0.5,
                polygon: None,
            }),
            RawItem::Block(RawBlock::new(0.0, 20.0, 10.0, 30.0, "keep-2")),
        ];

        let texts: Vec<String> = normalize_items(&items).into_iter().map(|b| b.text).collect();
        assert_eq!(texts, vec!["keep-1", "keep-2"]);
    }
}
