//! JSON block dumps as a page source.
//!
//! Two shapes are accepted: a bare list of blocks (one page), or
//! `{"pages": [{"raw_text": "...", "blocks": [...]}, ...]}`. Blocks are arrays
//! `[x0, y0, x1, y1, text]` or objects with the same keys.

use std::path::Path;

use serde::Deserialize;

use crate::error::ReadOrderError;
use crate::models::{PageInput, RawBlock, RawItem};
use crate::source::PageSource;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpRepr {
    Page(Vec<RawBlock>),
    Document { pages: Vec<DumpPage> },
}

#[derive(Debug, Deserialize)]
struct DumpPage {
    #[serde(default)]
    raw_text: Option<String>,
    #[serde(default)]
    blocks: Vec<RawBlock>,
}

/// Pages of raw blocks loaded from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDump {
    pages: Vec<PageInput>,
}

impl BlockDump {
    /// Parse a dump from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let pages = match serde_json::from_str::<DumpRepr>(json)? {
            DumpRepr::Page(blocks) => vec![build_page(1, None, blocks)],
            DumpRepr::Document { pages } => pages
                .into_iter()
                .enumerate()
                .map(|(i, page)| build_page(i as u32 + 1, page.raw_text, page.blocks))
                .collect(),
        };
        Ok(Self { pages })
    }

    /// Read a dump from a file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(ReadOrderError::InputNotFound(path.to_path_buf()));
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Without explicit raw text, the blocks' own text in file order stands in.
fn build_page(number: u32, raw_text: Option<String>, blocks: Vec<RawBlock>) -> PageInput {
    let raw_text = raw_text.unwrap_or_else(|| {
        blocks
            .iter()
            .filter_map(|b| b.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    });
    PageInput::new(number, raw_text, blocks.into_iter().map(RawItem::Block).collect())
}

impl PageSource for BlockDump {
    fn name(&self) -> &str {
        "json"
    }

    fn pages(&self) -> crate::Result<Vec<PageInput>> {
        Ok(self.pages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ReadingOrder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_page_list() {
        let dump = BlockDump::from_json(
            r#"[[0,0,50,10,"Name:"],[60,0,120,10,"Alice"],[0,20,50,30,"Age:"],[60,20,90,30,"30"]]"#,
        )
        .unwrap();

        assert_eq!(dump.name(), "json");
        let doc = dump.read(&ReadingOrder::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.text(), "Name: Alice\nAge: 30");
        assert_eq!(doc.raw_text(), "Name:\nAlice\nAge:\n30");
    }

    #[test]
    fn test_multi_page_document() {
        let dump = BlockDump::from_json(
            r#"{"pages": [
                {"raw_text": "native", "blocks": []},
                {"blocks": [{"x0": 40, "y0": 0, "x1": 80, "y1": 10, "text": "world"},
                            {"x0": 0, "y0": "0", "x1": 30, "y1": 10, "text": "hello"}]}
            ]}"#,
        )
        .unwrap();

        let doc = dump.read(&ReadingOrder::default()).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(!doc.pages()[0].ordered);
        assert_eq!(doc.pages()[1].ordered_text, "hello world");
        assert_eq!(doc.text(), "native\nhello world");
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let dump = BlockDump::from_json(
            r#"[[0, "top", 10, 10, "bad"], [0, 0, 10], [0, 0, 10, 10, null], [0, 0, 10, 10, "good"]]"#,
        )
        .unwrap();

        let doc = dump.read(&ReadingOrder::default()).unwrap();
        assert_eq!(doc.pages()[0].ordered_text, "good");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            BlockDump::from_json("{\"pages\": 3}"),
            Err(ReadOrderError::Json(_))
        ));
    }
}
