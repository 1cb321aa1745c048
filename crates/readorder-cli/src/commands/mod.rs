//! CLI subcommands.

pub mod blocks;
pub mod config;
pub mod ocr;
pub mod pdf;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use tracing::debug;

use readorder_core::models::{LayoutConfig, ReadOrderConfig};

/// Settings shared by the extraction commands.
pub struct Context {
    pub config: ReadOrderConfig,
    pub verbose: u8,
    pub timeout: Option<u64>,
}

impl Context {
    /// Load configuration from `--config`, else the default path if it exists.
    pub fn load(config_path: Option<&str>, verbose: u8, timeout: Option<u64>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => ReadOrderConfig::from_file(Path::new(path))?,
            None => {
                let default_path = config::default_config_path();
                if default_path.exists() {
                    debug!("Using config file {}", default_path.display());
                    ReadOrderConfig::from_file(&default_path)?
                } else {
                    ReadOrderConfig::default()
                }
            }
        };

        Ok(Self {
            config,
            verbose,
            timeout,
        })
    }

    /// Collaborator stderr stays visible when the user asked for logs.
    pub fn keep_stderr(&self) -> bool {
        self.verbose > 0
    }
}

/// Row clustering overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Smallest vertical gap still treated as the same row
    #[arg(long, value_name = "UNITS")]
    min_row_tolerance: Option<f64>,

    /// Row tolerance as a fraction of the median block height
    #[arg(long, value_name = "RATIO")]
    row_tolerance_ratio: Option<f64>,

    /// Fall back to raw text on pages with more blocks than this
    #[arg(long, value_name = "N")]
    max_blocks: Option<usize>,

    /// Order pages one after another instead of in parallel
    #[arg(long)]
    sequential: bool,
}

impl LayoutArgs {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply(&self, layout: &mut LayoutConfig) {
        if let Some(tol) = self.min_row_tolerance {
            layout.min_row_tolerance = tol;
        }
        if let Some(ratio) = self.row_tolerance_ratio {
            layout.row_tolerance_ratio = ratio;
        }
        if let Some(max) = self.max_blocks {
            layout.max_blocks_per_page = max;
        }
        if self.sequential {
            layout.parallel_pages = false;
        }
    }
}

/// Default OCR model directory.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("readorder")
        .join("models")
}

/// Run blocking extraction work off the async runtime, with an optional deadline.
pub async fn run_blocking<T, F>(timeout: Option<u64>, work: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);

    let joined = match timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), task)
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {}s", secs))?,
        None => task.await,
    };

    joined.map_err(|e| anyhow::anyhow!("extraction worker failed: {}", e))?
}
