//! Postgres storage
//!
//! Uniqueness of short codes is enforced by a unique index spanning deleted collections, scan
//! counts are incremented in a single `UPDATE`

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::ipnetwork::IpNetwork;
use uuid::Uuid;

use crate::collections::LinkCollection;
use crate::ownership::OwnerId;

use super::AuditEntry;
use super::CreateCollectionValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateCollectionValues;
use super::types::AuditEntryType;
use super::types::LogoShapeType;
use super::types::MIGRATOR;
use super::types::SqlxCollection;
use super::types::SqlxLink;

/// Postgres storage
#[derive(Clone, Debug)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Connect to the database behind the connection string
    ///
    /// Migrations will be run
    pub async fn connect(database_connection_string: &str) -> Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_connection_string)
            .await
            .map_err(connection_error)?;

        Self::with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(|err| Error::Connection(format!("Migrations could not run: {err}")))?;

        Ok(Self { connection_pool })
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_collection_by_id(&self, id: &Uuid) -> Result<Option<LinkCollection>> {
        let collection = sqlx::query_as::<_, SqlxCollection>(
            r"
            SELECT *
            FROM link_collections
            WHERE deleted_at IS NULL AND id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        LinkCollection::from_sqlx_collection_optional(collection)
    }

    async fn find_single_collection_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<LinkCollection>> {
        let collection = sqlx::query_as::<_, SqlxCollection>(
            r"
            SELECT *
            FROM link_collections
            WHERE short_code = $1
            LIMIT 1
            ",
        )
        .bind(short_code)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        LinkCollection::from_sqlx_collection_optional(collection)
    }

    async fn find_all_collections_by_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<LinkCollection>> {
        let collections = sqlx::query_as::<_, SqlxCollection>(
            r"
            SELECT *
            FROM link_collections
            WHERE deleted_at IS NULL AND owner_id = $1
            ORDER BY updated_at DESC, created_at DESC
            ",
        )
        .bind(owner_id.as_str())
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        LinkCollection::from_sqlx_collection_multiple(collections)
    }

    async fn create_collection(&self, values: &CreateCollectionValues) -> Result<LinkCollection> {
        let collection = sqlx::query_as::<_, SqlxCollection>(
            r"
            INSERT INTO link_collections (id, short_code, owner_id, title, logo_ref, logo_shape, links)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.short_code)
        .bind(values.owner_id.map(OwnerId::as_str))
        .bind(values.title)
        .bind(values.logo.map(|logo| logo.reference.as_str()))
        .bind(values.logo.map(|logo| LogoShapeType::from_shape(logo.shape)))
        .bind(SqlxLink::from_links(values.links))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(insert_error)?;

        LinkCollection::from_sqlx_collection(collection)
    }

    async fn update_collection(
        &self,
        collection: &LinkCollection,
        values: &UpdateCollectionValues,
    ) -> Result<Option<LinkCollection>> {
        let title = values.title.unwrap_or(collection.title.as_deref());
        let logo = values.logo.unwrap_or(collection.logo.as_ref());
        let links = values.links.unwrap_or(&collection.links);

        let updated_collection = sqlx::query_as::<_, SqlxCollection>(
            r"
            UPDATE link_collections
            SET title = $1, logo_ref = $2, logo_shape = $3, links = $4, updated_at = CURRENT_TIMESTAMP
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING *
            ",
        )
        .bind(title)
        .bind(logo.map(|logo| logo.reference.as_str()))
        .bind(logo.map(|logo| LogoShapeType::from_shape(logo.shape)))
        .bind(SqlxLink::from_links(links))
        .bind(collection.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        LinkCollection::from_sqlx_collection_optional(updated_collection)
    }

    async fn delete_collection(&self, collection: &LinkCollection) -> Result<()> {
        sqlx::query(
            r"
            UPDATE link_collections
            SET deleted_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(collection.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn register_scan(&self, collection: &LinkCollection) -> Result<Option<LinkCollection>> {
        let scanned_collection = sqlx::query_as::<_, SqlxCollection>(
            r"
            UPDATE link_collections
            SET scan_count = scan_count + 1, last_scanned_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            ",
        )
        .bind(collection.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        LinkCollection::from_sqlx_collection_optional(scanned_collection)
    }

    async fn register_audit_trail(
        &self,
        created_by: Option<&OwnerId>,
        entry: &AuditEntry,
        ip_address: Option<&IpAddr>,
    ) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO audit_trail (id, type, created_by, collection_id, ip_address)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(AuditEntryType::from_audit_entry(entry))
        .bind(created_by.map(OwnerId::as_str))
        .bind(entry.collection().id)
        .bind(ip_address.map(|ip_address| IpNetwork::from(*ip_address)))
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}

/// Convert `SQLx` insert errors, a unique violation means the short code is taken
fn insert_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
            Error::ShortCodeTaken
        }
        _ => connection_error(err),
    }
}
