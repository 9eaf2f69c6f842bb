//! All things related to the storage of link collections

use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::collections::LinkCollection;
use crate::links::Links;
use crate::links::LogoRef;
use crate::ownership::OwnerId;

pub use memory::Memory;
pub use postgres::Postgres;

mod memory;
mod postgres;
mod types;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// The short code is already used by another (maybe deleted) collection
    #[error("Short code is already taken")]
    ShortCodeTaken,

    /// A stored record could not be turned into a collection
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a collection
pub struct CreateCollectionValues<'a> {
    /// Owner of the collection, `None` for anonymous
    pub owner_id: Option<&'a OwnerId>,

    /// Freshly drawn short code
    pub short_code: &'a str,

    /// Optional title
    pub title: Option<&'a str>,

    /// Optional logo
    pub logo: Option<&'a LogoRef>,

    /// The links
    pub links: &'a Links,
}

/// Values to update a collection
///
/// `None` leaves a field untouched, `Some(None)` clears an optional field
pub struct UpdateCollectionValues<'a> {
    /// New title
    pub title: Option<Option<&'a str>>,

    /// New logo
    pub logo: Option<Option<&'a LogoRef>>,

    /// New links, replaces all links
    pub links: Option<&'a Links>,
}

/// Possible audit trail entry types
pub enum AuditEntry<'a> {
    /// Collection is created
    CreateCollection(&'a LinkCollection),

    /// Collection is updated
    UpdateCollection(&'a LinkCollection),

    /// Collection is deleted
    DeleteCollection(&'a LinkCollection),
}

impl AuditEntry<'_> {
    /// The collection the entry is about
    pub fn collection(&self) -> &LinkCollection {
        match self {
            Self::CreateCollection(collection)
            | Self::UpdateCollection(collection)
            | Self::DeleteCollection(collection) => collection,
        }
    }
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find a single collection by ID
    ///
    /// Respects the soft-delete
    async fn find_single_collection_by_id(&self, id: &Uuid) -> Result<Option<LinkCollection>>;

    /// Find a single collection by short code
    ///
    /// DOES NOT respect the soft-delete, handle with care
    async fn find_single_collection_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<LinkCollection>>;

    /// Find all collections of an owner, most recently updated first
    ///
    /// Respects the soft-delete
    async fn find_all_collections_by_owner(&self, owner_id: &OwnerId)
    -> Result<Vec<LinkCollection>>;

    /// Create a collection
    ///
    /// Fails with [`Error::ShortCodeTaken`] when any collection, deleted or not, already has
    /// the short code. The check and the insert are a single atomic step.
    async fn create_collection(&self, values: &CreateCollectionValues) -> Result<LinkCollection>;

    /// Update a single collection
    ///
    /// Returns `None` when the collection was deleted in the meantime
    async fn update_collection(
        &self,
        collection: &LinkCollection,
        values: &UpdateCollectionValues,
    ) -> Result<Option<LinkCollection>>;

    /// Soft-delete a collection
    async fn delete_collection(&self, collection: &LinkCollection) -> Result<()>;

    /// Increment the scan count by exactly one
    ///
    /// Single atomic step, returns `None` when the collection was deleted in the meantime
    async fn register_scan(&self, collection: &LinkCollection) -> Result<Option<LinkCollection>>;

    /// Register a creative/destructive action on the audit trail
    async fn register_audit_trail(
        &self,
        created_by: Option<&OwnerId>,
        entry: &AuditEntry,
        ip_address: Option<&IpAddr>,
    ) -> Result<()>;
}
