//! Blocks command - order blocks from a JSON dump.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use readorder_core::{BlockDump, PageSource, ReadingOrder};

use super::{run_blocking, Context, LayoutArgs};
use crate::output::DocumentEnvelope;

/// Arguments for the blocks command.
#[derive(Args, Debug)]
pub struct BlocksArgs {
    /// JSON file holding a block list or `{"pages": [...]}`
    input: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,
}

pub async fn run(args: BlocksArgs, ctx: &Context) -> anyhow::Result<DocumentEnvelope> {
    if !args.input.exists() {
        anyhow::bail!("Block file not found: {}", args.input.display());
    }

    let mut layout = ctx.config.layout.clone();
    args.layout.apply(&mut layout);

    info!("Reading blocks: {}", args.input.display());

    let input = args.input;
    let (doc, source_name) = run_blocking(ctx.timeout, move || -> anyhow::Result<_> {
        let dump = BlockDump::from_file(&input)?;
        Ok((dump.read(&ReadingOrder::from_config(&layout))?, dump.name().to_string()))
    })
    .await?;

    Ok(DocumentEnvelope::new(&doc, source_name))
}
