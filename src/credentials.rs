//! Parsing of the request-header dump that carries the session credentials.
//!
//! The operator copies the request headers of an authenticated XHR call from
//! the browser into a text file. Exactly one `authorization: Bearer <token>`
//! line and exactly one `cookie: <value>` line must be present.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};

use crate::error::ConfigError;

static AUTHORIZATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"authorization:\sBearer\s(.*)").expect("valid regex"));

static COOKIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cookie:\s(.*)").expect("valid regex"));

/// Pre-captured session credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token, without the `Bearer ` prefix.
    pub authorization: String,
    /// Raw `Cookie` header value.
    pub cookie: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("authorization", &"<redacted>")
            .field("cookie", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Extracts credentials from the text of a header dump.
    ///
    /// Blank lines and surrounding whitespace are ignored. Keys are
    /// case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CookieFormat`] unless exactly one of each
    /// header is present.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let headers = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let authorization: Vec<&str> = AUTHORIZATION_RE
            .captures_iter(&headers)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        let cookie: Vec<&str> = COOKIE_RE
            .captures_iter(&headers)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();

        match (authorization.as_slice(), cookie.as_slice()) {
            ([authorization], [cookie]) => Ok(Self {
                authorization: (*authorization).to_string(),
                cookie: (*cookie).to_string(),
            }),
            _ => Err(ConfigError::CookieFormat {
                authorization: authorization.len(),
                cookie: cookie.len(),
            }),
        }
    }

    /// Reads and parses a header dump from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CookieFileNotFound`] if the file cannot be
    /// read, or [`ConfigError::CookieFormat`] if its content is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            log::debug!("Reading {} failed: {e}", path.display());
            ConfigError::CookieFileNotFound(path.to_path_buf())
        })?;
        Self::parse(&text)
    }

    /// Request headers that authenticate page requests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderValue`] naming the header whose
    /// value cannot appear in an HTTP request.
    pub fn to_headers(&self) -> Result<HeaderMap, ConfigError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", self.authorization))
            .map_err(|_| ConfigError::InvalidHeaderValue("authorization"))?;
        authorization.set_sensitive(true);
        let mut cookie = HeaderValue::from_str(&self.cookie)
            .map_err(|_| ConfigError::InvalidHeaderValue("cookie"))?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }
}
