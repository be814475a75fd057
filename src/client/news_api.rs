//! NewsAPI-backed article source.
//!
//! Fetches one page of stories from the `everything` endpoint and decodes
//! the JSON body into [`Page`]s. Parsing is a pure function separated from
//! the HTTP call so tests can exercise it without hitting the network.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Article, ArticleSource, FetchError, Page};

/// Sources queried when the user does not override them.
pub const DEFAULT_DOMAINS: &str = "techcrunch.com,thenextweb.com";

/// Articles requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// The whole request (connect, send, read body) must finish within this.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// A paged article source backed by the NewsAPI `everything` endpoint.
pub struct NewsApi {
    http: reqwest::blocking::Client,
    base_url: String,
    /// Comma-separated source domains, passed through verbatim.
    domains: String,
    api_key: String,
}

impl NewsApi {
    /// Create a client for the given credential and source domains.
    pub fn new(api_key: impl Into<String>, domains: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            domains: domains.into(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at a different server, so tests can target a
    /// local mock.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Decode a raw response body into a [`Page`].
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// decoding logic without a server.
    pub fn parse_response(body: &[u8], page_key: u32) -> Result<Page, FetchError> {
        let response: NewsResponse =
            serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        // A well-formed body can still declare failure in-band.
        if response.status != "ok" {
            return Err(FetchError::Parse(format!(
                "unexpected response status {:?}",
                response.status
            )));
        }

        let items = response.articles.into_iter().map(Article::from).collect();
        Ok(Page::new(items, page_key))
    }
}

impl ArticleSource for NewsApi {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    fn fetch_page(&self, page_key: u32, page_size: u32) -> Result<Page, FetchError> {
        let started = Instant::now();
        let page_param = page_key.to_string();
        let size_param = page_size.to_string();

        let response = self
            .http
            .get(format!("{}/everything", self.base_url))
            .query(&[
                ("domains", self.domains.as_str()),
                ("page", page_param.as_str()),
                ("pageSize", size_param.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(page_key, status = status.as_u16(), "server rejected page fetch");
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.bytes()?;
        let page = Self::parse_response(&body, page_key)?;
        debug!(
            page_key,
            items = page.items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched page"
        );
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Top-level response shape of the `everything` endpoint.
///
/// The endpoint also reports `totalResults`, but pagination is driven by
/// the empty-page signal, so only `status` and `articles` are decoded;
/// unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    status: String,
    #[serde(default)]
    articles: Vec<WireArticle>,
}

/// A single article as the API sends it. Every field is optional on the
/// wire; absences become `None` rather than decode failures.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    title: Option<String>,
    description: Option<String>,
    url_to_image: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        // Parse RFC 3339 timestamps; gracefully degrade to None on failure.
        let published = wire
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Article {
            title: wire.title.unwrap_or_else(|| "(untitled)".to_string()),
            description: wire.description,
            image_url: wire.url_to_image,
            url: wire.url,
            published,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
