//! JSON envelopes printed on stdout.

use std::io::Write;

use serde::Serialize;
use serde_json::json;

use readorder_core::models::DocumentResult;

use crate::quiet;

/// Result of `pdf` and `blocks`.
#[derive(Debug, Serialize)]
pub struct DocumentEnvelope {
    pub success: bool,
    pub text: String,
    pub raw_text: String,
    pub ordered: bool,
    pub ordered_pages: usize,
    pub page_count: usize,
    pub extractor: String,
}

impl DocumentEnvelope {
    pub fn new(doc: &DocumentResult, extractor: impl Into<String>) -> Self {
        Self {
            success: true,
            text: doc.text(),
            raw_text: doc.raw_text(),
            ordered: doc.ordered(),
            ordered_pages: doc.ordered_pages(),
            page_count: doc.page_count(),
            extractor: extractor.into(),
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Print one envelope.
pub fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let line = render(value, pretty)?;
    let mut out = quiet::stdout();
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}

/// Print a failure envelope and return the exit code.
pub fn emit_error(message: &str, pretty: bool) -> i32 {
    let envelope = json!({ "success": false, "error": message });
    let line = render(&envelope, pretty)
        .unwrap_or_else(|_| r#"{"success":false,"error":"unknown error"}"#.to_string());

    let mut out = quiet::stdout();
    let _ = writeln!(out, "{}", line);
    let _ = out.flush();
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use readorder_core::models::PageResult;

    #[test]
    fn test_document_envelope() {
        let doc = DocumentResult::new(vec![
            PageResult::new(1, "b a", "a b"),
            PageResult::unordered(2, "tail"),
        ]);
        let value = serde_json::to_value(DocumentEnvelope::new(&doc, "json")).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "text": "a b\ntail",
                "raw_text": "b a\ntail",
                "ordered": true,
                "ordered_pages": 1,
                "page_count": 2,
                "extractor": "json",
            })
        );
    }
}
