//! Grouping of documents into output buckets
//!
//! Pure functions only: no network access, no side effects. Bucket placement
//! depends solely on a document's status.

use crate::types::{Document, Status};
use serde::{Deserialize, Serialize};

/// One of the three rendered output groupings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// new / later / shortlist — waiting to be read
    Queue,
    /// archive — finished or filed away
    Archive,
    /// feed — subscription items
    Feed,
}

impl Bucket {
    /// Map a status to its bucket
    ///
    /// Unrecognized statuses land in the archive rather than being dropped.
    #[must_use]
    pub fn for_status(status: Status) -> Self {
        match status {
            Status::New | Status::Later | Status::Shortlist => Bucket::Queue,
            Status::Archive | Status::Unknown => Bucket::Archive,
            Status::Feed => Bucket::Feed,
        }
    }

    /// Name of the markdown file this bucket renders into
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Bucket::Queue => "queue.md",
            Bucket::Archive => "archive.md",
            Bucket::Feed => "feed.md",
        }
    }
}

/// The full document set partitioned into buckets, ready for rendering
#[derive(Clone, Debug, Default)]
pub struct Library {
    /// Documents waiting to be read, newest saved first
    pub queue: Vec<Document>,
    /// Archived documents, newest saved first
    pub archive: Vec<Document>,
    /// Feed documents, newest saved first
    pub feed: Vec<Document>,
}

impl Library {
    /// Partition documents into buckets
    ///
    /// When `categories` is non-empty, documents whose category name is not
    /// listed are excluded from every bucket (they still appear in the raw
    /// JSON backup, which is written from the unpartitioned collection).
    /// Every remaining document lands in exactly one bucket; each bucket is
    /// sorted by saved timestamp descending, documents without one last.
    #[must_use]
    pub fn partition(documents: &[Document], categories: &[String]) -> Self {
        let mut library = Library::default();

        for document in documents {
            if !categories.is_empty()
                && !categories.iter().any(|c| c == document.category.as_str())
            {
                continue;
            }
            match Bucket::for_status(document.status) {
                Bucket::Queue => library.queue.push(document.clone()),
                Bucket::Archive => library.archive.push(document.clone()),
                Bucket::Feed => library.feed.push(document.clone()),
            }
        }

        for bucket in [
            &mut library.queue,
            &mut library.archive,
            &mut library.feed,
        ] {
            bucket.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        }

        library
    }

    /// The documents in one bucket
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[Document] {
        match bucket {
            Bucket::Queue => &self.queue,
            Bucket::Archive => &self.archive,
            Bucket::Feed => &self.feed,
        }
    }

    /// Total number of documents across all buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len() + self.archive.len() + self.feed.len()
    }

    /// True when every bucket is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
