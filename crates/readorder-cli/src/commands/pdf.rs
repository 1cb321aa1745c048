//! Pdf command - extract text from a PDF in reading order.

use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use readorder_core::{PageSource, PdfExtractor, ReadingOrder};

use super::{run_blocking, Context, LayoutArgs};
use crate::output::DocumentEnvelope;
use crate::quiet;

/// Arguments for the pdf command.
#[derive(Args, Debug)]
pub struct PdfArgs {
    /// PDF file to extract
    input: PathBuf,

    /// Only process the first N pages (0 = all)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    #[command(flatten)]
    layout: LayoutArgs,
}

pub async fn run(args: PdfArgs, ctx: &Context) -> anyhow::Result<DocumentEnvelope> {
    if !args.input.exists() {
        anyhow::bail!("PDF file not found: {}", args.input.display());
    }

    let mut config = ctx.config.clone();
    args.layout.apply(&mut config.layout);
    if let Some(max) = args.max_pages {
        config.pdf.max_pages = max;
    }

    info!("Processing PDF: {}", args.input.display());

    let keep_stderr = ctx.keep_stderr();
    let input = args.input;
    let (doc, extractor_name) = run_blocking(ctx.timeout, move || -> anyhow::Result<_> {
        let order = ReadingOrder::from_config(&config.layout);
        quiet::suppress_output(keep_stderr, || {
            let extractor = PdfExtractor::open(&input, config.pdf)?;
            debug!("Loaded {} pages", extractor.page_count());
            Ok((extractor.read(&order)?, extractor.name().to_string()))
        })
    })
    .await?;

    info!(
        "Ordered {} of {} pages",
        doc.ordered_pages(),
        doc.page_count()
    );

    Ok(DocumentEnvelope::new(&doc, extractor_name))
}
