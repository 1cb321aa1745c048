//! Ocr command - recognize text in an image.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use readorder_core::models::OcrLine;
use readorder_core::{recognize_file, ReadingOrder};

use super::{default_model_dir, run_blocking, Context, LayoutArgs};
use crate::quiet;

/// Arguments for the ocr command.
#[derive(Args, Debug)]
pub struct OcrArgs {
    /// Image file to recognize
    input: PathBuf,

    /// Directory with det.onnx, latin_rec.onnx and latin_dict.txt
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Keep [UNK] tokens in recognized text
    #[arg(long)]
    keep_unk: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

/// Result of the ocr command.
#[derive(Debug, Serialize)]
pub struct OcrEnvelope {
    pub success: bool,
    /// Line texts in engine order.
    pub text: String,
    pub lines: Vec<OcrLine>,
    pub line_count: usize,
    /// Line texts re-ordered by their boxes.
    pub ordered_text: String,
    pub ordered: bool,
    pub processing_time_ms: u64,
    pub engine: String,
}

pub async fn run(args: OcrArgs, ctx: &Context) -> anyhow::Result<OcrEnvelope> {
    if !args.input.exists() {
        anyhow::bail!("Image file not found: {}", args.input.display());
    }

    let mut config = ctx.config.clone();
    args.layout.apply(&mut config.layout);
    if args.keep_unk {
        config.ocr.keep_unk = true;
    }

    let model_dir = args
        .model_dir
        .or_else(|| config.ocr.model_dir.clone())
        .unwrap_or_else(default_model_dir);

    info!("Processing image: {}", args.input.display());

    let keep_stderr = ctx.keep_stderr();
    let input = args.input;
    let (result, page) = run_blocking(ctx.timeout, move || -> anyhow::Result<_> {
        let result =
            quiet::suppress_output(keep_stderr, || recognize_file(&input, &model_dir, &config.ocr))?;
        let page = result.order(&ReadingOrder::from_config(&config.layout));
        Ok((result, page))
    })
    .await?;

    info!(
        "Recognized {} lines in {}ms",
        result.lines.len(),
        result.processing_time_ms
    );

    Ok(OcrEnvelope {
        success: true,
        line_count: result.lines.len(),
        text: result.text,
        lines: result.lines,
        ordered_text: page.final_text().to_string(),
        ordered: page.ordered,
        processing_time_ms: result.processing_time_ms,
        engine: "pure-onnx-ocr".to_string(),
    })
}
