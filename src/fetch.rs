//! Pagination and highlight enrichment
//!
//! Both passes are strictly sequential: one request in flight at a time, in a
//! single control flow. Enrichment is the slow path (one extra request per
//! document) and is only run when the caller asked for highlights.

use crate::client::{ListQuery, ReaderClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Document, Status};
use tracing::{debug, info, warn};

/// Locations fetched for a full export, in queue/archive/feed order
const FETCH_ORDER: [Status; 5] = [
    Status::New,
    Status::Later,
    Status::Shortlist,
    Status::Archive,
    Status::Feed,
];

/// Fetch every document for one location, following the continuation cursor
/// until the server signals the final page
///
/// The loop is bounded by cursor termination and by `max_pages`, so a server
/// that keeps handing out cursors cannot spin the run forever.
///
/// # Errors
/// Any page failure is fatal for the whole run; the error carries the cursor
/// of the failing page. Exceeding `max_pages` is reported the same way.
pub async fn fetch_documents(
    client: &ReaderClient,
    location: Option<Status>,
    max_pages: usize,
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let query = ListQuery {
            location,
            cursor: cursor.clone(),
            ..ListQuery::default()
        };
        let page = client.list_page(&query).await?;
        documents.extend(page.results);
        pages += 1;

        match page.next_page_cursor {
            Some(next) => {
                if pages >= max_pages {
                    return Err(Error::Fetch {
                        message: format!("pagination exceeded the safety cap of {max_pages} pages"),
                        cursor: Some(next),
                    });
                }
                debug!(fetched = documents.len(), pages, "continuing pagination");
                cursor = Some(next);
            }
            None => break,
        }
    }

    Ok(documents)
}

/// Fetch the complete library: every known location in queue/archive/feed
/// order, with child records (highlights, notes) dropped from the top level
///
/// # Errors
/// Fatal on any pagination failure; see [`fetch_documents`].
pub async fn fetch_library(client: &ReaderClient, config: &Config) -> Result<Vec<Document>> {
    let mut all = Vec::new();
    for location in FETCH_ORDER {
        debug!(location = location.as_str(), "fetching documents");
        let documents = fetch_documents(client, Some(location), config.max_pages).await?;
        info!(
            location = location.as_str(),
            count = documents.len(),
            "fetched documents"
        );
        // highlight/note children come back as their own records; only
        // top-level entries belong in the export
        all.extend(documents.into_iter().filter(|d| d.parent_id.is_none()));
    }
    Ok(all)
}

/// Attach highlights to every document, one detail request per document
///
/// A failure for one document never aborts the run: that document keeps an
/// empty highlight list and the failure is logged. Returns the number of
/// documents that were degraded this way, for the end-of-run summary.
pub async fn enrich_highlights(client: &ReaderClient, documents: &mut [Document]) -> usize {
    let total = documents.len();
    let mut degraded = 0usize;

    for (index, document) in documents.iter_mut().enumerate() {
        match client.document_highlights(&document.id).await {
            Ok(highlights) => {
                debug!(
                    document_id = %document.id,
                    count = highlights.len(),
                    "fetched highlights"
                );
                document.highlights = highlights;
            }
            Err(e) => {
                warn!(
                    document_id = %document.id,
                    error = %e,
                    "highlight fetch failed, continuing with empty highlights"
                );
                document.highlights = Vec::new();
                degraded += 1;
            }
        }
        if (index + 1) % 10 == 0 {
            info!(processed = index + 1, total, "highlight enrichment progress");
        }
    }

    degraded
}
