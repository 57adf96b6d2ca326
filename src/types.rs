//! Core data types for the reading-list export
//!
//! These map the Reader API's wire format onto a strongly-typed model at the
//! crate boundary. Field names follow the API (`location`, `nextPageCursor`,
//! `saved_at`, ...); unknown statuses and categories deserialize to fallback
//! variants rather than failing, so one odd record cannot poison a page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Reading status of a document (wire name `location`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Freshly saved, not yet triaged
    New,
    /// Queued to read later
    Later,
    /// Shortlisted for reading soon
    Shortlist,
    /// Finished or filed away
    Archive,
    /// Arrived via a feed subscription
    Feed,
    /// Any status string this crate does not recognize
    #[serde(other)]
    Unknown,
}

impl Status {
    /// The wire-format string for this status
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Later => "later",
            Status::Shortlist => "shortlist",
            Status::Archive => "archive",
            Status::Feed => "feed",
            Status::Unknown => "unknown",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown
    }
}

/// Content category of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Web article
    Article,
    /// Saved email
    Email,
    /// RSS item
    Rss,
    /// PDF file
    Pdf,
    /// EPUB file
    Epub,
    /// Tweet or thread
    Tweet,
    /// Video
    Video,
    /// Standalone note
    Note,
    /// Highlight child record
    Highlight,
    /// Any category string this crate does not recognize
    #[serde(other)]
    Other,
}

impl Category {
    /// The wire-format string for this category
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Article => "article",
            Category::Email => "email",
            Category::Rss => "rss",
            Category::Pdf => "pdf",
            Category::Epub => "epub",
            Category::Tweet => "tweet",
            Category::Video => "video",
            Category::Note => "note",
            Category::Highlight => "highlight",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Article
    }
}

/// One reading-list entry
///
/// Created fresh on every run, held in memory for the duration of the export,
/// and serialized into `data.json`. Exactly one [`Status`] per document at
/// render time; grouping is a pure function of that status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier assigned by the service
    pub id: String,

    /// Title, if the service extracted one
    #[serde(default)]
    pub title: Option<String>,

    /// Original source URL
    #[serde(default)]
    pub source_url: Option<String>,

    /// Author name
    #[serde(default)]
    pub author: Option<String>,

    /// Publishing site name
    #[serde(default)]
    pub site_name: Option<String>,

    /// Content category (default: article)
    #[serde(default)]
    pub category: Category,

    /// Word count, when known
    #[serde(default)]
    pub word_count: Option<u64>,

    /// Human-readable reading time label; the API emits both strings and
    /// bare minute counts, so both are accepted
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub reading_time: Option<String>,

    /// Reading progress as a fraction in `0.0..=1.0`
    #[serde(default)]
    pub reading_progress: Option<f64>,

    /// Tag names, sorted; the API returns either an object keyed by tag name
    /// or a plain list, both are accepted
    #[serde(default, deserialize_with = "tags_map_or_list")]
    pub tags: Vec<String>,

    /// When the document was saved
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,

    /// When the source was published; kept as a raw string because the API
    /// emits both dates and full timestamps
    #[serde(default)]
    pub published_date: Option<String>,

    /// Service-generated summary
    #[serde(default)]
    pub summary: Option<String>,

    /// User notes on the document
    #[serde(default)]
    pub notes: Option<String>,

    /// Parent document id; present on highlight/note child records, which
    /// are not top-level reading-list entries
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Reading status (wire name `location`)
    #[serde(rename = "location", default)]
    pub status: Status,

    /// Highlights attached by the enrichment pass; empty unless highlight
    /// fetching was requested. Not part of the list endpoint's payload.
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

/// A user-created annotation attached to a document
///
/// Owned exclusively by its parent [`Document`]; no independent lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// The highlighted text
    pub content: String,

    /// Optional note attached to the highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Optional position within the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<i64>,
}

/// Wire form of a highlight: the detail endpoint returns highlights as child
/// documents, with the text in `content` (falling back to `title`) and the
/// note in `notes`
#[derive(Debug, Deserialize)]
pub(crate) struct HighlightRecord {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    location: Option<i64>,
}

impl HighlightRecord {
    /// Convert to the typed model; records with no text are dropped
    pub(crate) fn into_highlight(self) -> Option<Highlight> {
        let HighlightRecord {
            content,
            title,
            notes,
            location,
        } = self;
        let content = content
            .filter(|c| !c.is_empty())
            .or_else(|| title.filter(|t| !t.is_empty()))?;
        Some(Highlight {
            content,
            note: notes.filter(|n| !n.is_empty()),
            location,
        })
    }
}

/// One page of the paginated list endpoint
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    /// Records on this page. The explicit default fn keeps serde's derive
    /// from inferring a `T: Default` bound on the impl.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,

    /// Continuation cursor; `None` signals the final page
    #[serde(rename = "nextPageCursor", default)]
    pub next_page_cursor: Option<String>,
}

fn tags_map_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        Map(BTreeMap<String, serde_json::Value>),
        List(Vec<String>),
    }

    Ok(match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::Map(map)) => map.into_keys().collect(),
        Some(Tags::List(mut list)) => {
            list.sort();
            list
        }
        None => Vec::new(),
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) if !s.is_empty() => Some(s),
        Some(Raw::Text(_)) | None => None,
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
    })
}
