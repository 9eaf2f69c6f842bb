//! Ownership gateway
//!
//! Decides who may touch a collection. The collection store only accepts an [`Authorized`]
//! collection for mutations, which can only be created here.

use serde::Serialize;
use uuid::Uuid;

use crate::collections::Error;
use crate::collections::LinkCollection;
use crate::collections::Result;
use crate::storage::Storage;

/// Opaque identifier of an owner, never empty
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner ID, `None` for an empty identifier
    pub fn new(id: String) -> Option<Self> {
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of whoever makes a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Caller {
    /// Authenticated owner
    Owner(OwnerId),

    /// No identity
    Anonymous,
}

impl Caller {
    /// The owner ID, if any
    pub fn owner_id(&self) -> Option<&OwnerId> {
        match self {
            Self::Owner(owner_id) => Some(owner_id),
            Self::Anonymous => None,
        }
    }
}

/// A collection the caller is allowed to mutate
#[derive(Debug)]
pub struct Authorized {
    /// The collection, as it was when authorized
    collection: LinkCollection,
}

impl Authorized {
    pub fn collection(&self) -> &LinkCollection {
        &self.collection
    }

    pub fn into_collection(self) -> LinkCollection {
        self.collection
    }
}

/// Ownership gateway
#[derive(Clone)]
pub struct OwnershipGateway<S: Storage> {
    /// Storage to look up the collections
    storage: S,
}

impl<S: Storage> OwnershipGateway<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Authorize the caller for the collection
    ///
    /// Fails with [`Error::NotFound`] for unknown or deleted collections and
    /// [`Error::Forbidden`] for anyone but the owner
    pub async fn authorize(&self, caller: &Caller, collection_id: &Uuid) -> Result<Authorized> {
        let collection = self
            .storage
            .find_single_collection_by_id(collection_id)
            .await?
            .ok_or(Error::NotFound)?;

        authorize_collection(caller, collection)
    }
}

/// Compare the caller against the owner of the collection
///
/// Anonymous collections are never authorized, not even for an anonymous caller
fn authorize_collection(caller: &Caller, collection: LinkCollection) -> Result<Authorized> {
    match (caller.owner_id(), collection.owner_id.as_ref()) {
        (Some(caller_id), Some(owner_id)) if caller_id == owner_id => {
            Ok(Authorized { collection })
        }
        _ => {
            tracing::debug!(
                "Caller {:?} is not the owner of collection {}",
                caller,
                collection.id
            );

            Err(Error::Forbidden)
        }
    }
}
