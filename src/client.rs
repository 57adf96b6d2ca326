//! Authenticated HTTP client for the Reader API
//!
//! One [`ReaderClient`] is constructed per run and passed by reference to the
//! paginator and enricher; it owns the only HTTP session in the process.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Document, Highlight, HighlightRecord, ListResponse, Status};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("reader-md/", env!("CARGO_PKG_VERSION"));

/// Query parameters for the list endpoint
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    /// Filter by reading status (wire param `location`)
    pub location: Option<Status>,
    /// Filter by category name
    pub category: Option<String>,
    /// Restrict to child records of this document
    pub parent_id: Option<String>,
    /// Continuation cursor from the previous page
    pub cursor: Option<String>,
}

impl ListQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(location) = self.location {
            params.push(("location", location.as_str().to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(parent_id) = &self.parent_id {
            params.push(("parent_id", parent_id.clone()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("pageCursor", cursor.clone()));
        }
        params
    }
}

/// HTTP client for the Reader API
///
/// Wraps a [`reqwest::Client`] with an explicit per-request timeout and the
/// bearer credential from [`Config`].
#[derive(Debug)]
pub struct ReaderClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl ReaderClient {
    /// Create a new client from the run configuration
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        // Url::join treats a base without a trailing slash as a file path
        // and would drop its last segment
        let mut base = config.api_base.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| Error::Config {
            message: format!("invalid API base URL {base:?}: {e}"),
            key: Some("api_base".into()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base,
            token: config.token.clone(),
        })
    }

    /// Fetch one page of the list endpoint
    ///
    /// # Errors
    /// - [`Error::Auth`] when the service rejects the token (HTTP 401/403)
    /// - [`Error::Fetch`] for any other HTTP or decoding failure, carrying
    ///   the page cursor for diagnostics
    pub async fn list_page(&self, query: &ListQuery) -> Result<ListResponse<Document>> {
        let url = self.endpoint("list/")?;
        debug!(%url, cursor = ?query.cursor, "requesting list page");

        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| Error::Fetch {
                message: format!("list request failed: {e}"),
                cursor: query.cursor.clone(),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth(format!(
                "the service rejected the access token (HTTP {})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(Error::Fetch {
                message: format!("list endpoint returned HTTP {}", status.as_u16()),
                cursor: query.cursor.clone(),
            });
        }

        response
            .json::<ListResponse<Document>>()
            .await
            .map_err(|e| Error::Fetch {
                message: format!("failed to decode list response: {e}"),
                cursor: query.cursor.clone(),
            })
    }

    /// Fetch the highlights attached to one document
    ///
    /// The service models highlights as child records of their document, so
    /// this is a list call restricted by `parent_id`.
    ///
    /// # Errors
    /// Returns [`Error::HighlightFetch`]; the caller decides whether to
    /// degrade or abort (the enricher degrades).
    pub async fn document_highlights(&self, document_id: &str) -> Result<Vec<Highlight>> {
        let url = self
            .endpoint("list/")
            .map_err(|e| highlight_error(document_id, &e))?;
        debug!(%url, document_id, "requesting highlights");

        let query = ListQuery {
            parent_id: Some(document_id.to_string()),
            category: Some("highlight".to_string()),
            ..ListQuery::default()
        };

        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| Error::HighlightFetch {
                document_id: document_id.to_string(),
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HighlightFetch {
                document_id: document_id.to_string(),
                message: format!("detail endpoint returned HTTP {}", status.as_u16()),
            });
        }

        let page: ListResponse<HighlightRecord> =
            response.json().await.map_err(|e| Error::HighlightFetch {
                document_id: document_id.to_string(),
                message: format!("failed to decode highlights: {e}"),
            })?;

        Ok(page
            .results
            .into_iter()
            .filter_map(HighlightRecord::into_highlight)
            .collect())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| Error::Config {
            message: format!("cannot build endpoint URL for {path:?}: {e}"),
            key: Some("api_base".into()),
        })
    }
}

fn highlight_error(document_id: &str, source: &Error) -> Error {
    Error::HighlightFetch {
        document_id: document_id.to_string(),
        message: source.to_string(),
    }
}
