//! Collection store
//!
//! Create, update, delete and list link collections. Ownership is checked by the
//! [`OwnershipGateway`](crate::ownership::OwnershipGateway), mutations here take its
//! [`Authorized`] result.

use crate::collections::Error;
use crate::collections::LinkCollection;
use crate::collections::Result;
use crate::links::Links;
use crate::links::LogoRef;
use crate::ownership::Authorized;
use crate::ownership::Caller;
use crate::short_code::ShortCodeAllocator;
use crate::storage;
use crate::storage::CreateCollectionValues;
use crate::storage::Storage;
use crate::storage::UpdateCollectionValues;

/// Content of a new collection, validated
#[derive(Clone, Debug, Default)]
pub struct CollectionDraft {
    /// Optional title
    pub title: Option<String>,

    /// Optional logo
    pub logo: Option<LogoRef>,

    /// The links
    pub links: Links,
}

/// Changes to a collection, validated
///
/// `None` leaves a field untouched, `Some(None)` clears it
#[derive(Clone, Debug, Default)]
pub struct CollectionChanges {
    /// New title
    pub title: Option<Option<String>>,

    /// New logo
    pub logo: Option<Option<LogoRef>>,

    /// New links
    pub links: Option<Links>,
}

/// Collection store
#[derive(Clone)]
pub struct CollectionStore<S: Storage> {
    /// Storage of the collections
    storage: S,

    /// Allocator for new short codes
    allocator: ShortCodeAllocator,
}

impl<S: Storage> CollectionStore<S> {
    pub fn new(storage: S, allocator: ShortCodeAllocator) -> Self {
        Self { storage, allocator }
    }

    /// Create a collection with a fresh short code
    ///
    /// A candidate that is already known is skipped, a candidate claimed by a concurrent
    /// create in between is rejected by the storage and skipped as well. Both use up one
    /// attempt of the allocator.
    pub async fn create(&self, caller: &Caller, draft: &CollectionDraft) -> Result<LinkCollection> {
        for short_code in self.allocator.candidates() {
            let existing = self
                .storage
                .find_single_collection_by_short_code(&short_code)
                .await?;

            if existing.is_some() {
                tracing::debug!(r#"Short code "{short_code}" already exists, drawing again"#);
                continue;
            }

            let values = CreateCollectionValues {
                owner_id: caller.owner_id(),
                short_code: &short_code,
                title: draft.title.as_deref(),
                logo: draft.logo.as_ref(),
                links: &draft.links,
            };

            match self.storage.create_collection(&values).await {
                Ok(collection) => {
                    tracing::info!(
                        r#"Created collection {} with short code "{}""#,
                        collection.id,
                        collection.short_code
                    );

                    return Ok(collection);
                }
                Err(storage::Error::ShortCodeTaken) => {
                    tracing::debug!(r#"Short code "{short_code}" was taken concurrently"#);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let attempts = self.allocator.max_attempts();

        tracing::error!(
            "No free short code after {attempts} attempts, the code space is running full"
        );

        Err(Error::AllocationExhausted(attempts))
    }

    /// Update title, logo and/or links of a collection
    ///
    /// Short code, owner and scan count are never touched
    pub async fn update(
        &self,
        authorized: Authorized,
        changes: &CollectionChanges,
    ) -> Result<LinkCollection> {
        let values = UpdateCollectionValues {
            title: changes.title.as_ref().map(Option::as_deref),
            logo: changes.logo.as_ref().map(Option::as_ref),
            links: changes.links.as_ref(),
        };

        self.storage
            .update_collection(authorized.collection(), &values)
            .await?
            .ok_or(Error::NotFound)
    }

    /// Soft-delete a collection, its short code stays reserved
    pub async fn delete(&self, authorized: Authorized) -> Result<LinkCollection> {
        let collection = authorized.into_collection();

        self.storage.delete_collection(&collection).await?;

        tracing::info!(
            r#"Deleted collection {}, short code "{}" is retired"#,
            collection.id,
            collection.short_code
        );

        Ok(collection)
    }

    /// All collections of the caller, most recently updated first
    ///
    /// Anonymous callers never own anything
    pub async fn list_by_owner(&self, caller: &Caller) -> Result<Vec<LinkCollection>> {
        match caller.owner_id() {
            Some(owner_id) => Ok(self
                .storage
                .find_all_collections_by_owner(owner_id)
                .await?),
            None => Ok(Vec::new()),
        }
    }
}
