//! Command-line entry point for reader-md

use clap::Parser;
use reader_md::{Config, Exporter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Export a Readwise Reader library to markdown files
#[derive(Debug, Parser)]
#[command(name = "reader-md", version, about)]
struct Cli {
    /// Output directory for the markdown files and JSON backup
    #[arg(short = 'o', long, default_value = "./output")]
    output_dir: PathBuf,

    /// Also fetch highlights for each document (slower, one extra request
    /// per document)
    #[arg(long)]
    with_highlights: bool,

    /// Only include these categories (e.g. article pdf epub)
    #[arg(long, value_name = "CATEGORY", num_args = 1..)]
    categories: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => Config {
            output_dir: cli.output_dir,
            with_highlights: cli.with_highlights,
            categories: cli.categories,
            ..config
        },
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let output_dir = config.output_dir.clone();

    let exporter = match Exporter::new(config) {
        Ok(exporter) => exporter,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match exporter.run().await {
        Ok(summary) => {
            info!(
                total = summary.total,
                queue = summary.queue,
                archive = summary.archive,
                feed = summary.feed,
                "export complete"
            );
            if summary.degraded_highlights > 0 {
                warn!(
                    count = summary.degraded_highlights,
                    "documents exported with empty highlights after failed fetches"
                );
            }
            for failure in &summary.write_failures {
                warn!("could not write {failure}");
            }
            info!(
                "output in {}; open README.md for the index",
                output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
