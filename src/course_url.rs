//! Course URL handling and step URL derivation.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A course page URL of the form `<base>/<step-slug>/<tail>`.
///
/// Every step of the course lives at the same URL with the step slug
/// swapped, and `tail` (often empty or a query string) kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseUrl {
    raw: String,
    base: String,
    tail: String,
}

impl CourseUrl {
    /// Validates a course URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CourseUrl`] if the URL does not contain the two
    /// `/` separators the step URL template needs, or is not http(s).
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::CourseUrl(format!(
                "{url} (expected an http(s) URL)"
            )));
        }

        let mut parts = url.rsplitn(3, '/');
        let tail = parts.next();
        let _current_step = parts.next();
        let base = parts.next();
        match (base, tail) {
            (Some(base), Some(tail)) if !base.ends_with('/') && base.contains("://") => Ok(Self {
                raw: url.to_string(),
                base: base.to_string(),
                tail: tail.to_string(),
            }),
            _ => Err(ConfigError::CourseUrl(format!(
                "{url} (expected .../<course>/<step>/...)"
            ))),
        }
    }

    /// The URL as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// URL of the step identified by `slug`.
    #[must_use]
    pub fn step(&self, slug: &str) -> String {
        format!("{}/{}/{}", self.base, slug, self.tail)
    }
}

impl FromStr for CourseUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CourseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
