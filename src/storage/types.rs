//! Database storage types and functions

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use sqlx::migrate::Migrator;
use sqlx::types::Json;
use uuid::Uuid;

use crate::collections::LinkCollection;
use crate::links::Links;
use crate::links::LogoRef;
use crate::links::LogoShape;
use crate::ownership::OwnerId;

use super::AuditEntry;
use super::Error;
use super::Result;

/// Migrator to run migrations on startup
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// `SQLx` type for logo shape
#[derive(Clone, Copy, PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "logo_shape_type")]
#[sqlx(rename_all = "kebab-case")]
pub enum LogoShapeType {
    /// Square
    Square,

    /// Circle
    Circle,
}

impl LogoShapeType {
    /// Create logo shape type from logo shape
    pub fn from_shape(shape: LogoShape) -> Self {
        match shape {
            LogoShape::Square => Self::Square,
            LogoShape::Circle => Self::Circle,
        }
    }

    /// Create logo shape from logo shape type
    pub fn to_shape(self) -> LogoShape {
        match self {
            Self::Square => LogoShape::Square,
            Self::Circle => LogoShape::Circle,
        }
    }
}

/// `SQLx` type for audit trail entry type
#[derive(PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "audit_trail_entry_type")]
#[sqlx(rename_all = "kebab-case")]
pub enum AuditEntryType {
    /// Collection is created
    CreateCollection,

    /// Collection is updated
    UpdateCollection,

    /// Collection is deleted
    DeleteCollection,
}

impl AuditEntryType {
    /// Create audit entry type from audit entry
    pub fn from_audit_entry(entry: &AuditEntry) -> Self {
        match entry {
            AuditEntry::CreateCollection(_) => Self::CreateCollection,
            AuditEntry::UpdateCollection(_) => Self::UpdateCollection,
            AuditEntry::DeleteCollection(_) => Self::DeleteCollection,
        }
    }
}

/// Stored shape of a single link, kept in a JSONB column
#[derive(Debug, Deserialize, Serialize)]
pub struct SqlxLink {
    /// Name of the link
    pub name: String,

    /// Destination of the link
    pub url: String,
}

impl SqlxLink {
    /// Create the stored links from validated links
    pub fn from_links(links: &Links) -> Json<Vec<Self>> {
        Json(
            links
                .iter()
                .map(|link| Self {
                    name: link.name().to_string(),
                    url: link.url().to_string(),
                })
                .collect(),
        )
    }
}

/// `SQLx` version of a collection
#[derive(sqlx::FromRow)]
pub struct SqlxCollection {
    /// Collection ID
    pub id: Uuid,

    /// Short code
    pub short_code: String,

    /// Owner, `NULL` for anonymous
    pub owner_id: Option<String>,

    /// Title
    pub title: Option<String>,

    /// Logo reference
    pub logo_ref: Option<String>,

    /// Logo shape
    pub logo_shape: Option<LogoShapeType>,

    /// Links
    pub links: Json<Vec<SqlxLink>>,

    /// Scan count
    pub scan_count: i64,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,

    /// Last scanned at
    pub last_scanned_at: Option<NaiveDateTime>,

    /// Deleted at
    pub deleted_at: Option<NaiveDateTime>,
}

impl LinkCollection {
    /// Create collection from `SQLx` version
    ///
    /// Stored links are validated again, a record that breaks the invariants is rejected
    pub fn from_sqlx_collection(collection: SqlxCollection) -> Result<Self> {
        let links = Links::parse(
            collection
                .links
                .0
                .into_iter()
                .map(|link| (link.name, link.url)),
        )
        .map_err(|err| Error::InvalidRecord(format!("{}: {err}", collection.id)))?;

        let logo = match (collection.logo_ref, collection.logo_shape) {
            (Some(reference), shape) => Some(
                LogoRef::new(
                    &reference,
                    shape.map(LogoShapeType::to_shape).unwrap_or_default(),
                )
                .map_err(|err| Error::InvalidRecord(format!("{}: {err}", collection.id)))?,
            ),
            (None, _) => None,
        };

        let scan_count = u64::try_from(collection.scan_count)
            .map_err(|err| Error::InvalidRecord(format!("{}: {err}", collection.id)))?;

        Ok(Self {
            id: collection.id,
            short_code: collection.short_code,
            owner_id: collection.owner_id.and_then(OwnerId::new),
            title: collection.title,
            logo,
            links,
            scan_count,
            created_at: collection.created_at,
            updated_at: collection.updated_at,
            last_scanned_at: collection.last_scanned_at,
            deleted_at: collection.deleted_at,
        })
    }

    /// Maybe create collection from `SQLx` version
    pub fn from_sqlx_collection_optional(collection: Option<SqlxCollection>) -> Result<Option<Self>> {
        collection.map(Self::from_sqlx_collection).transpose()
    }

    /// Create multiple collections from `SQLx` version
    pub fn from_sqlx_collection_multiple(collections: Vec<SqlxCollection>) -> Result<Vec<Self>> {
        collections
            .into_iter()
            .map(Self::from_sqlx_collection)
            .collect()
    }
}
