//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::cmp::Reverse;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::collections::LinkCollection;
use crate::ownership::OwnerId;

use super::AuditEntry;
use super::CreateCollectionValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateCollectionValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All collections in storage, deleted ones included
    collections: Arc<Mutex<HashMap<Uuid, LinkCollection>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_collection_by_id(&self, id: &Uuid) -> Result<Option<LinkCollection>> {
        Ok(self
            .collections
            .lock()
            .await
            .get(id)
            .filter(|collection| !collection.is_deleted())
            .cloned())
    }

    async fn find_single_collection_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<LinkCollection>> {
        Ok(self
            .collections
            .lock()
            .await
            .values()
            .find(|collection| collection.short_code == short_code)
            .cloned())
    }

    async fn find_all_collections_by_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<LinkCollection>> {
        let mut collections = self
            .collections
            .lock()
            .await
            .values()
            .filter(|collection| {
                !collection.is_deleted() && collection.owner_id.as_ref() == Some(owner_id)
            })
            .cloned()
            .collect::<Vec<LinkCollection>>();

        collections.sort_by_key(|collection| {
            (
                Reverse(collection.updated_at),
                Reverse(collection.created_at),
            )
        });

        Ok(collections)
    }

    async fn create_collection(&self, values: &CreateCollectionValues) -> Result<LinkCollection> {
        let mut collections = self.collections.lock().await;

        // checked under the same lock as the insert
        if collections
            .values()
            .any(|collection| collection.short_code == values.short_code)
        {
            return Err(Error::ShortCodeTaken);
        }

        let now = Utc::now().naive_utc();

        let collection = LinkCollection {
            id: Uuid::new_v4(),
            short_code: values.short_code.to_string(),
            owner_id: values.owner_id.cloned(),
            title: values.title.map(ToString::to_string),
            logo: values.logo.cloned(),
            links: values.links.clone(),
            scan_count: 0,
            created_at: now,
            updated_at: now,
            last_scanned_at: None,
            deleted_at: None,
        };

        collections.insert(collection.id, collection.clone());

        Ok(collection)
    }

    async fn update_collection(
        &self,
        collection: &LinkCollection,
        values: &UpdateCollectionValues,
    ) -> Result<Option<LinkCollection>> {
        Ok(self
            .collections
            .lock()
            .await
            .get_mut(&collection.id)
            .filter(|collection| !collection.is_deleted())
            .map(|collection| {
                if let Some(title) = values.title {
                    collection.title = title.map(ToString::to_string);
                }

                if let Some(logo) = values.logo {
                    collection.logo = logo.cloned();
                }

                if let Some(links) = values.links {
                    collection.links = links.clone();
                }

                collection.updated_at = Utc::now().naive_utc();

                collection.clone()
            }))
    }

    async fn delete_collection(&self, collection: &LinkCollection) -> Result<()> {
        if let Some(collection) = self.collections.lock().await.get_mut(&collection.id) {
            if !collection.is_deleted() {
                let now = Utc::now().naive_utc();

                collection.updated_at = now;
                collection.deleted_at = Some(now);
            }
        }

        Ok(())
    }

    async fn register_scan(&self, collection: &LinkCollection) -> Result<Option<LinkCollection>> {
        Ok(self
            .collections
            .lock()
            .await
            .get_mut(&collection.id)
            .filter(|collection| !collection.is_deleted())
            .map(|collection| {
                collection.scan_count += 1;
                collection.last_scanned_at = Some(Utc::now().naive_utc());

                collection.clone()
            }))
    }

    async fn register_audit_trail(
        &self,
        _created_by: Option<&OwnerId>,
        _entry: &AuditEntry,
        _ip_address: Option<&IpAddr>,
    ) -> Result<()> {
        Ok(())
    }
}
