//! Export orchestration
//!
//! Runs the whole pipeline: fetch → optional highlight enrichment →
//! partition → render → write. Output files are written independently; a
//! failed write is recorded and the remaining files are still attempted.

use crate::client::ReaderClient;
use crate::config::Config;
use crate::error::{Error, Result, WriteFailure};
use crate::fetch::{enrich_highlights, fetch_library};
use crate::library::{Bucket, Library};
use crate::render;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{info, warn};

/// Drives one export run
pub struct Exporter {
    client: ReaderClient,
    config: Config,
}

/// Outcome of a successful (possibly degraded) run
#[derive(Clone, Debug, Default)]
pub struct ExportSummary {
    /// Total documents fetched (before any category filter)
    pub total: usize,
    /// Documents rendered into queue.md
    pub queue: usize,
    /// Documents rendered into archive.md
    pub archive: usize,
    /// Documents rendered into feed.md
    pub feed: usize,
    /// Documents whose highlight fetch failed and were exported with an
    /// empty highlight list
    pub degraded_highlights: usize,
    /// Output files that could not be written
    pub write_failures: Vec<WriteFailure>,
}

impl Exporter {
    /// Build an exporter, validating the configuration and constructing the
    /// HTTP client
    ///
    /// # Errors
    /// Fails on invalid configuration or a missing credential.
    pub fn new(config: Config) -> Result<Self> {
        let client = ReaderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// Run the export
    ///
    /// # Errors
    /// - [`Error::Auth`] / [`Error::Fetch`] abort before anything is written
    /// - [`Error::AllWritesFailed`] when no output file could be written
    ///
    /// Partial write failures do not error; they are reported in the
    /// returned [`ExportSummary`].
    pub async fn run(&self) -> Result<ExportSummary> {
        info!("fetching documents");
        let mut documents = fetch_library(&self.client, &self.config).await?;
        info!(total = documents.len(), "fetch complete");

        let degraded_highlights = if self.config.with_highlights {
            info!("fetching highlights (one request per document)");
            enrich_highlights(&self.client, &mut documents).await
        } else {
            0
        };

        let library = Library::partition(&documents, &self.config.categories);

        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let mut outputs: Vec<(PathBuf, String)> = Vec::new();
        for bucket in [Bucket::Queue, Bucket::Archive, Bucket::Feed] {
            let bucket_documents = library.bucket(bucket);
            if bucket_documents.is_empty() {
                continue;
            }
            outputs.push((
                self.config.output_dir.join(bucket.file_name()),
                render::bucket_section(bucket, bucket_documents),
            ));
        }
        outputs.push((
            self.config.output_dir.join("README.md"),
            render::index(&library, Utc::now()),
        ));
        // raw backup keeps every document, including those excluded from the
        // bucket files by the category filter
        outputs.push((
            self.config.output_dir.join("data.json"),
            serde_json::to_string_pretty(&documents)?,
        ));

        let attempted = outputs.len();
        let mut write_failures = Vec::new();
        for (path, contents) in outputs {
            match tokio::fs::write(&path, contents).await {
                Ok(()) => info!(path = %path.display(), "wrote output file"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to write output file");
                    write_failures.push(WriteFailure {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }
        if !write_failures.is_empty() && write_failures.len() == attempted {
            return Err(Error::AllWritesFailed {
                failures: write_failures,
            });
        }

        Ok(ExportSummary {
            total: documents.len(),
            queue: library.queue.len(),
            archive: library.archive.len(),
            feed: library.feed.len(),
            degraded_highlights,
            write_failures,
        })
    }
}
