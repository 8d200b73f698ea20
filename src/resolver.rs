//! Fetching course pages and extracting their embedded page state.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Marker that identifies the inline script holding the page state.
pub const STATE_MARKER: &str = "window.__INITIAL_STATE__";

static STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^\s*window\.__INITIAL_STATE__\s*=\s*(\{.*?\})\s*;\s*$").expect("valid regex")
});

/// Source of page-state documents, keyed by page URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page at `url` and returns its decoded page state.
    async fn fetch_state(&self, url: &str) -> Result<Value>;
}

/// Fetches pages with the operator's session credentials.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    client: reqwest::Client,
}

impl ContentResolver {
    /// Builds a resolver that authenticates every request with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be encoded as headers or the
    /// HTTP client cannot be built.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_client_builder(credentials, reqwest::Client::builder())
    }

    /// Like [`ContentResolver::new`], starting from a caller-supplied builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be encoded as headers or the
    /// HTTP client cannot be built.
    pub fn with_client_builder(
        credentials: &Credentials,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self> {
        let client = builder
            .default_headers(credentials.to_headers()?)
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Sends one authenticated GET and extracts the page state.
    ///
    /// No retry happens here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] on a non-success status, [`Error::Http`] on a
    /// network failure and [`Error::Parse`] if the page has no usable state.
    pub async fn resolve(&self, url: &str) -> Result<Value> {
        log::debug!("Fetching page {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        extract_state(&body)
    }
}

#[async_trait]
impl PageSource for ContentResolver {
    async fn fetch_state(&self, url: &str) -> Result<Value> {
        self.resolve(url).await
    }
}

/// Extracts the JSON object assigned to `window.__INITIAL_STATE__` in an
/// HTML document.
///
/// The object starts after the assignment and ends at the first `}` that is
/// followed by a `;` closing the line.
///
/// # Errors
///
/// Returns [`Error::Parse`] if no script carries the marker, the assignment
/// cannot be delimited, or the extracted text is not valid JSON.
pub fn extract_state(html: &str) -> Result<Value> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").map_err(|e| Error::Parse(e.to_string()))?;

    let script = document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .find(|text| text.contains(STATE_MARKER))
        .ok_or_else(|| Error::Parse(format!("no script containing {STATE_MARKER}")))?;

    let json = STATE_RE
        .captures(&script)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::Parse(format!("{STATE_MARKER} assignment not found")))?;

    serde_json::from_str(json.as_str()).map_err(|e| Error::Parse(format!("invalid JSON: {e}")))
}
