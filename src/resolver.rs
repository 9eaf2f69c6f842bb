//! Resolver
//!
//! The public side of a collection: short code in, current links out. Every successful
//! resolution counts as one scan.

use serde::Serialize;

use crate::collections::Error;
use crate::collections::LinkCollection;
use crate::collections::Result;
use crate::links::Links;
use crate::links::LogoRef;
use crate::short_code::normalize_short_code;
use crate::storage::Storage;

/// What a scanner gets to see of a collection
///
/// Never contains the owner
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicView {
    /// Short code the collection was resolved by
    pub short_code: String,

    /// Title
    pub title: Option<String>,

    /// Logo
    pub logo: Option<LogoRef>,

    /// The current links
    pub links: Links,

    /// Scan count, this scan included
    pub scan_count: u64,
}

impl PublicView {
    fn from_collection(collection: LinkCollection) -> Self {
        Self {
            short_code: collection.short_code,
            title: collection.title,
            logo: collection.logo,
            links: collection.links,
            scan_count: collection.scan_count,
        }
    }
}

/// Resolver
#[derive(Clone)]
pub struct Resolver<S: Storage> {
    /// Storage to resolve from
    storage: S,
}

impl<S: Storage> Resolver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Resolve a short code and count the scan
    ///
    /// [`Error::NotFound`] when the code was never issued, [`Error::Gone`] when its
    /// collection was deleted. Neither touches any scan count.
    pub async fn resolve(&self, short_code: &str) -> Result<PublicView> {
        let collection = self.find_live(short_code).await?;

        // deleted between lookup and scan
        let scanned = self
            .storage
            .register_scan(&collection)
            .await?
            .ok_or(Error::Gone)?;

        Ok(PublicView::from_collection(scanned))
    }

    /// Same outcome as [`Resolver::resolve`], without counting a scan
    pub async fn check(&self, short_code: &str) -> Result<()> {
        self.find_live(short_code).await.map(|_| ())
    }

    async fn find_live(&self, short_code: &str) -> Result<LinkCollection> {
        let Some(short_code) = normalize_short_code(short_code) else {
            tracing::debug!(r#"Short code "{short_code}" can not exist"#);

            return Err(Error::NotFound);
        };

        tracing::debug!(r#"Looking for short code "{short_code}""#);

        let collection = self
            .storage
            .find_single_collection_by_short_code(&short_code)
            .await?
            .ok_or(Error::NotFound)?;

        if collection.is_deleted() {
            tracing::debug!(r#"Short code "{short_code}" no longer exists"#);

            return Err(Error::Gone);
        }

        Ok(collection)
    }
}
