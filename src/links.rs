//! Links and logos
//!
//! The validated building blocks of a collection, invalid values can not be constructed

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Maximum number of links a single collection can hold
pub const MAX_LINKS: usize = 10;

/// Reasons why the content of a collection is rejected
///
/// Link positions are 1-based, matching what a person filling in a form sees
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// More than [`MAX_LINKS`] links
    #[error("A collection can hold at most {max} links, got {0}", max = MAX_LINKS)]
    TooManyLinks(usize),

    /// Name is empty or only whitespace
    #[error("Link {0} is missing a name")]
    MissingName(usize),

    /// URL is empty or only whitespace
    #[error("Link {0} is missing a url")]
    MissingUrl(usize),

    /// URL is not an absolute URL
    #[error("Link {0} has an invalid url: {1}")]
    InvalidUrl(usize, String),

    /// URL is not a web address
    #[error(r#"Link {0} must use "http" or "https", got "{1}""#)]
    UnsupportedScheme(usize, String),

    /// Logo reference is empty or only whitespace
    #[error("Logo reference can not be empty")]
    EmptyLogoReference,
}

/// A single named destination
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    name: String,
    url: String,
}

impl LinkEntry {
    /// Create a link entry, name and url are both required
    pub fn new(name: &str, url: &str) -> Result<Self, ValidationError> {
        Self::at_position(1, name, url)
    }

    fn at_position(position: usize, name: &str, url: &str) -> Result<Self, ValidationError> {
        let name = normalize_text(name).ok_or(ValidationError::MissingName(position))?;

        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingUrl(position));
        }

        // only validated, the url is kept as entered
        let parsed =
            Url::parse(url).map_err(|err| ValidationError::InvalidUrl(position, err.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ValidationError::UnsupportedScheme(
                position,
                parsed.scheme().to_string(),
            ));
        }

        Ok(Self {
            name,
            url: url.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Ordered links of a collection, never more than [`MAX_LINKS`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(Vec<LinkEntry>);

impl Links {
    /// Validate `(name, url)` pairs into links
    ///
    /// The bound is checked first, then every entry in order
    pub fn parse<I, N, U>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (N, U)>,
        N: AsRef<str>,
        U: AsRef<str>,
    {
        let entries = entries.into_iter().collect::<Vec<(N, U)>>();

        if entries.len() > MAX_LINKS {
            return Err(ValidationError::TooManyLinks(entries.len()));
        }

        entries
            .iter()
            .enumerate()
            .map(|(index, (name, url))| {
                LinkEntry::at_position(index + 1, name.as_ref(), url.as_ref())
            })
            .collect::<Result<Vec<LinkEntry>, ValidationError>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkEntry> {
        self.0.iter()
    }
}

/// Shape the logo is rendered in, purely cosmetic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoShape {
    /// Square logo
    #[default]
    Square,

    /// Round logo
    Circle,
}

/// Reference to an externally stored logo image
///
/// Never interpreted, only stored and handed back
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoRef {
    /// Opaque blob reference
    pub reference: String,

    /// Shape of the logo
    pub shape: LogoShape,
}

impl LogoRef {
    /// Create a logo reference, the reference can not be empty
    pub fn new(reference: &str, shape: LogoShape) -> Result<Self, ValidationError> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(ValidationError::EmptyLogoReference);
        }

        Ok(Self {
            reference: reference.to_string(),
            shape,
        })
    }
}

/// Trim and NFC-normalize free text
///
/// Returns `None` when nothing is left
pub fn normalize_text(text: &str) -> Option<String> {
    let text = text.trim().nfc().collect::<String>();

    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_entry() {
        let link = LinkEntry::new("  Site ", " https://a.com ").unwrap();
        assert_eq!("Site", link.name());
        assert_eq!("https://a.com", link.url());

        assert_eq!(
            Err(ValidationError::MissingName(1)),
            LinkEntry::new("   ", "https://a.com")
        );
        assert_eq!(
            Err(ValidationError::MissingUrl(1)),
            LinkEntry::new("Site", "")
        );
        assert!(matches!(
            LinkEntry::new("Site", "not a url"),
            Err(ValidationError::InvalidUrl(1, _))
        ));

        assert_eq!(
            "http://a.com",
            LinkEntry::new("Site", "http://a.com").unwrap().url()
        );
        for (url, scheme) in [
            ("javascript:alert(document.cookie)", "javascript"),
            ("data:text/html,<script>alert(1)</script>", "data"),
            ("file:///etc/passwd", "file"),
            ("ftp://a.com", "ftp"),
        ] {
            assert_eq!(
                Err(ValidationError::UnsupportedScheme(1, scheme.to_string())),
                LinkEntry::new("Site", url)
            );
        }
    }

    #[test]
    fn test_links_bound() {
        let ten = (0..MAX_LINKS).map(|i| (format!("Link {i}"), format!("https://{i}.example.com")));
        assert_eq!(MAX_LINKS, Links::parse(ten).unwrap().len());

        let eleven =
            (0..=MAX_LINKS).map(|i| (format!("Link {i}"), format!("https://{i}.example.com")));
        assert_eq!(
            Err(ValidationError::TooManyLinks(11)),
            Links::parse(eleven)
        );

        let empty = Links::parse(Vec::<(&str, &str)>::new()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_links_report_position() {
        let links = vec![
            ("Site", "https://a.com"),
            ("Shop", ""),
            ("", "https://c.com"),
        ];

        assert_eq!(Err(ValidationError::MissingUrl(2)), Links::parse(links));
    }

    #[test]
    fn test_normalize_text() {
        let decomposed = String::from_utf8(vec![97, 204, 136]).unwrap();
        let composed = String::from_utf8(vec![195, 164]).unwrap();

        assert_eq!(Some(composed), normalize_text(&decomposed));
        assert_eq!(None, normalize_text(" \t "));
    }

    #[test]
    fn test_logo_ref() {
        let logo = LogoRef::new(" logos/abc.png ", LogoShape::Circle).unwrap();
        assert_eq!("logos/abc.png", logo.reference);

        assert_eq!(
            Err(ValidationError::EmptyLogoReference),
            LogoRef::new("", LogoShape::Square)
        );
    }
}
