//! Data models shared by the extraction and ordering stages.

pub mod block;
pub mod config;
pub mod document;

pub use block::{Block, Coordinate, OcrLine, PageInput, RawBlock, RawItem};
pub use config::{LayoutConfig, OcrConfig, PdfConfig, ReadOrderConfig};
pub use document::{DocumentResult, PageResult};
