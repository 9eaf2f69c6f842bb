//! Public URLs
//!
//! The only thing that ends up in a scannable image is `{origin}/q/{short_code}`. That shape
//! is printed on paper, it can not change for codes that are already out there.

use thiserror::Error;
use url::Url;

/// Reasons why an origin can not be used
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidOrigin {
    /// Not a URL at all
    #[error("Invalid origin: {0}")]
    Parse(String),

    /// Only web origins can be scanned
    #[error(r#"Origin must use "http" or "https", got "{0}""#)]
    Scheme(String),

    /// Query or fragment would end up in front of the short code
    #[error("Origin can not contain a query or fragment")]
    QueryOrFragment,
}

/// Builds the public URL of a short code
#[derive(Clone, Debug)]
pub struct PublicUrl {
    /// Origin without trailing slash
    origin: String,
}

impl PublicUrl {
    /// Create a builder for the origin, e.g. `https://example.com`
    ///
    /// A path is allowed, a trailing slash is ignored
    pub fn new(origin: &str) -> Result<Self, InvalidOrigin> {
        let url = Url::parse(origin.trim()).map_err(|err| InvalidOrigin::Parse(err.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InvalidOrigin::Scheme(url.scheme().to_string()));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidOrigin::QueryOrFragment);
        }

        Ok(Self {
            origin: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The canonical scan URL of a short code
    pub fn for_short_code(&self, short_code: &str) -> String {
        format!("{}/q/{short_code}", self.origin)
    }
}
