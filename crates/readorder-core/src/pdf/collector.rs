//! Glyph-to-block collection on top of pdf-extract's [`OutputDev`].
//!
//! pdf-extract reports each glyph with its text rendering matrix in PDF user
//! space (origin bottom-left). Consecutive glyphs on the same baseline with
//! no wide horizontal gap are merged into one run; each run becomes a block
//! with page coordinates (origin top-left).

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::trace;

use crate::models::{PageInput, RawBlock, RawItem};

/// Portion of the font size above the baseline.
const ASCENT: f64 = 0.8;
/// Portion of the font size below the baseline.
const DESCENT: f64 = 0.2;

#[derive(Debug)]
struct Run {
    x0: f64,
    x1: f64,
    top: f64,
    bottom: f64,
    baseline: f64,
    size: f64,
    text: String,
}

/// Collects the positioned text runs of one page.
pub(super) struct BlockCollector {
    gap_ratio: f64,
    page_top: f64,
    run: Option<Run>,
    blocks: Vec<RawBlock>,
}

impl BlockCollector {
    pub(super) fn new(gap_ratio: f64) -> Self {
        Self {
            gap_ratio,
            page_top: 0.0,
            run: None,
            blocks: Vec::new(),
        }
    }

    /// Finish the page. Raw text is the runs in content-stream order.
    pub(super) fn into_page(mut self, number: u32) -> PageInput {
        self.flush();

        let raw_text = self
            .blocks
            .iter()
            .filter_map(|b| b.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let items = self.blocks.into_iter().map(RawItem::Block).collect();

        PageInput::new(number, raw_text, items)
    }

    fn flush(&mut self) {
        if let Some(run) = self.run.take() {
            trace!("Run {:?} at ({:.1}, {:.1})", run.text, run.x0, run.top);
            self.blocks
                .push(RawBlock::new(run.x0, run.top, run.x1, run.bottom, run.text));
        }
    }

    fn continues(&self, x: f64, baseline: f64, size: f64) -> bool {
        self.run.as_ref().is_some_and(|run| {
            let em = run.size.max(size);
            (run.baseline - baseline).abs() <= em * 0.5
                && x <= run.x1 + em * self.gap_ratio
                && x >= run.x0 - em
        })
    }

    fn push_glyph(&mut self, x: f64, baseline: f64, size: f64, advance: f64, glyph: &str) {
        let top = self.page_top - (baseline + size * ASCENT);
        let bottom = self.page_top - (baseline - size * DESCENT);
        let blank = glyph.trim().is_empty();

        if !self.continues(x, baseline, size) {
            self.flush();
            if blank {
                return;
            }
            self.run = Some(Run {
                x0: x,
                x1: x + advance,
                top,
                bottom,
                baseline,
                size,
                text: glyph.to_string(),
            });
            return;
        }

        if let Some(run) = self.run.as_mut() {
            let gap = x - run.x1;
            if blank {
                if !run.text.ends_with(' ') {
                    run.text.push(' ');
                }
            } else {
                if gap > run.size * 0.1 && !run.text.ends_with(' ') {
                    run.text.push(' ');
                }
                run.text.push_str(glyph);
            }
            run.x1 = run.x1.max(x + advance);
            run.top = run.top.min(top);
            run.bottom = run.bottom.max(bottom);
        }
    }
}

impl OutputDev for BlockCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page_top = media_box.ury;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let scale_x = trm.m11.hypot(trm.m12);
        let scale_y = trm.m21.hypot(trm.m22);
        let size = (font_size * scale_y).abs();
        let advance = (width * font_size * scale_x).abs();

        if !trm.m31.is_finite() || !trm.m32.is_finite() || !size.is_finite() {
            return Ok(());
        }

        self.push_glyph(trm.m31, trm.m32, size, advance, char);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}
