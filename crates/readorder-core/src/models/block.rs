//! Block records: the raw items handed over by extractors and the normalized
//! blocks the row clusterer works on.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of extracted text with an axis-aligned bounding box.
///
/// Coordinates follow the page convention: x grows rightward, y grows downward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// Trimmed, never empty.
    pub text: String,
    /// `max(y1 - y0, 1.0)`.
    pub height: f64,
}

/// A coordinate as delivered by an extractor, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Coordinate {
    /// Coerce to a finite float.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => s.trim().parse::<f64>().ok()?,
            Coordinate::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

/// A positioned text item from a page decoder.
///
/// Deserializes from a JSON array `[x0, y0, x1, y1, text, ...]` or an object
/// with `x0`, `y0`, `x1`, `y1` and `text` keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlockRepr")]
pub struct RawBlock {
    pub x0: Coordinate,
    pub y0: Coordinate,
    pub x1: Coordinate,
    pub y1: Coordinate,
    pub text: Option<String>,
}

impl RawBlock {
    /// Create a raw block from known-good geometry.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, text: impl Into<String>) -> Self {
        Self {
            x0: x0.into(),
            y0: y0.into(),
            x1: x1.into(),
            y1: y1.into(),
            text: Some(text.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBlockRepr {
    Seq(Vec<Value>),
    Record {
        #[serde(default)]
        x0: Value,
        #[serde(default)]
        y0: Value,
        #[serde(default)]
        x1: Value,
        #[serde(default)]
        y1: Value,
        #[serde(default)]
        text: Value,
    },
    Other(IgnoredAny),
}

impl From<RawBlockRepr> for RawBlock {
    fn from(repr: RawBlockRepr) -> Self {
        match repr {
            RawBlockRepr::Seq(values) if values.len() >= 5 => Self {
                x0: coordinate(&values[0]),
                y0: coordinate(&values[1]),
                x1: coordinate(&values[2]),
                y1: coordinate(&values[3]),
                text: text_value(&values[4]),
            },
            // Too short to carry geometry and text.
            RawBlockRepr::Seq(_) | RawBlockRepr::Other(_) => Self::default(),
            RawBlockRepr::Record { x0, y0, x1, y1, text } => Self {
                x0: coordinate(&x0),
                y0: coordinate(&y0),
                x1: coordinate(&x1),
                y1: coordinate(&y1),
                text: text_value(&text),
            },
        }
    }
}

fn coordinate(value: &Value) -> Coordinate {
    match value {
        Value::Number(n) => n.as_f64().map(Coordinate::Number).unwrap_or_default(),
        Value::String(s) => Coordinate::Text(s.clone()),
        _ => Coordinate::Missing,
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A recognized line from the OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    /// Recognized text.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default)]
    pub confidence: f32,

    /// Polygon around the line, as `[x, y]` points.
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f64; 2]>>,
}

impl OcrLine {
    /// Axis-aligned bounding rectangle `(min_x, min_y, max_x, max_y)` of the polygon.
    pub fn rect(&self) -> Option<(f64, f64, f64, f64)> {
        let points = self.polygon.as_deref().filter(|p| !p.is_empty())?;

        let min_x = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
        let min_y = points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);

        Some((min_x, min_y, max_x, max_y))
    }
}

/// An item from any extraction collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum RawItem {
    /// Positioned text from a page decoder.
    Block(RawBlock),
    /// A line from the OCR engine.
    Line(OcrLine),
}

impl From<RawBlock> for RawItem {
    fn from(block: RawBlock) -> Self {
        RawItem::Block(block)
    }
}

impl From<OcrLine> for RawItem {
    fn from(line: OcrLine) -> Self {
        RawItem::Line(line)
    }
}

/// Everything an extractor produced for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInput {
    /// Page number (1-indexed).
    pub number: u32,
    /// Text in the extractor's native order.
    pub raw_text: String,
    /// Positioned items, in no particular order.
    pub items: Vec<RawItem>,
}

impl PageInput {
    /// Create a page input.
    pub fn new(number: u32, raw_text: impl Into<String>, items: Vec<RawItem>) -> Self {
        Self {
            number,
            raw_text: raw_text.into(),
            items,
        }
    }

    /// A page whose extraction failed: no raw text, no items.
    pub fn failed(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }
}
