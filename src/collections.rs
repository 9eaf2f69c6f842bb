//! Link collections
//!
//! A collection is addressed by its short code, which never changes. Everything behind the
//! short code (title, logo and links) can be edited by its owner.

use chrono::naive::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::links::Links;
use crate::links::LogoRef;
use crate::links::ValidationError;
use crate::ownership::OwnerId;
use crate::storage;

/// A collection of links behind a short code
#[derive(Clone, Debug)]
pub struct LinkCollection {
    /// Collection ID
    pub id: Uuid,

    /// Public identifier, immutable and never reused
    pub short_code: String,

    /// Creator of the collection, `None` when created anonymously
    pub owner_id: Option<OwnerId>,

    /// Free-text label
    pub title: Option<String>,

    /// Cosmetic logo
    pub logo: Option<LogoRef>,

    /// The links
    pub links: Links,

    /// Number of resolutions, only touched by the resolver
    pub scan_count: u64,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at, scans do not count as updates
    pub updated_at: NaiveDateTime,

    /// Last resolved at
    pub last_scanned_at: Option<NaiveDateTime>,

    /// Soft-deleted at, the short code stays reserved
    pub deleted_at: Option<NaiveDateTime>,
}

impl LinkCollection {
    /// Is the collection soft-deleted?
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Errors of the collection operations
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected, nothing was stored
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller does not own the collection
    #[error("Not allowed to modify this collection")]
    Forbidden,

    /// Short code or collection never existed
    #[error("Link collection not found")]
    NotFound,

    /// Collection existed but has been deleted
    #[error("This link collection has been withdrawn")]
    Gone,

    /// No free short code found within the retry budget
    #[error("Could not allocate a free short code after {0} attempts")]
    AllocationExhausted(usize),

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] storage::Error),
}

/// Result type for all collection operations
pub type Result<T> = core::result::Result<T, Error>;
