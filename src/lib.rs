//! # reader-md
//!
//! Exports a Readwise Reader library to a small set of static markdown files
//! plus a JSON backup.
//!
//! The pipeline is deliberately simple and sequential: paginate the list
//! endpoint, optionally fetch highlights per document, partition the
//! documents into buckets by reading status, render markdown, write files.
//! There is no persistence between runs; `data.json` is the only durable
//! artifact.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reader_md::{Config, Exporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         token: std::env::var("READWISE_TOKEN")?,
//!         with_highlights: true,
//!         ..Config::default()
//!     };
//!
//!     let summary = Exporter::new(config)?.run().await?;
//!     println!("exported {} documents", summary.total);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Authenticated HTTP client for the Reader API
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Pagination and highlight enrichment
pub mod fetch;
/// Grouping of documents into output buckets
pub mod library;
/// Markdown rendering
pub mod render;
/// Core data types
pub mod types;

/// Export orchestration
pub mod export;

// Re-export commonly used types
pub use client::{ListQuery, ReaderClient};
pub use config::{Config, DEFAULT_API_BASE, TOKEN_ENV_VAR};
pub use error::{Error, Result, WriteFailure};
pub use export::{ExportSummary, Exporter};
pub use library::{Bucket, Library};
pub use types::{Category, Document, Highlight, ListResponse, Status};
