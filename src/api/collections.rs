//! Collections API endpoints
//!
//! Everything related to managing link collections, only ever by their owner

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::collection_store::CollectionChanges;
use crate::collection_store::CollectionDraft;
use crate::collection_store::CollectionStore;
use crate::collections::LinkCollection;
use crate::links::Links;
use crate::links::LogoRef;
use crate::links::LogoShape;
use crate::links::ValidationError;
use crate::links::normalize_text;
use crate::ownership::Caller;
use crate::ownership::OwnershipGateway;
use crate::public_url::PublicUrl;
use crate::storage::AuditEntry;
use crate::storage::Storage;

use super::AuditTrail;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::deserialize_present;

/// Collection response going to the owner
///
/// Basically filtering which fields are shown to the owner
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    /// Collection ID
    pub id: Uuid,

    /// Immutable short code
    pub short_code: String,

    /// URL to encode in the scannable image
    pub public_url: String,

    /// Title
    pub title: Option<String>,

    /// Logo
    pub logo: Option<LogoRef>,

    /// The links, in order
    pub links: Links,

    /// Number of successful scans
    pub scan_count: u64,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,

    /// Last scanned at
    pub last_scanned_at: Option<NaiveDateTime>,
}

impl CollectionResponse {
    fn from_collection(collection: LinkCollection, public_url: &PublicUrl) -> Self {
        Self {
            public_url: public_url.for_short_code(&collection.short_code),
            id: collection.id,
            short_code: collection.short_code,
            title: collection.title,
            logo: collection.logo,
            links: collection.links,
            scan_count: collection.scan_count,
            created_at: collection.created_at,
            updated_at: collection.updated_at,
            last_scanned_at: collection.last_scanned_at,
        }
    }

    fn from_collection_multiple(
        collections: Vec<LinkCollection>,
        public_url: &PublicUrl,
    ) -> Vec<Self> {
        collections
            .into_iter()
            .map(|collection| Self::from_collection(collection, public_url))
            .collect()
    }
}

/// A single link as submitted
///
/// Missing fields are reported as validation errors instead of JSON errors
#[derive(Debug, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    name: String,

    #[serde(default)]
    url: String,
}

/// A logo as submitted
#[derive(Debug, Deserialize)]
pub struct LogoForm {
    /// Opaque reference to the stored image
    reference: String,

    /// Shape, square when not provided
    shape: Option<LogoShape>,
}

impl LogoForm {
    pub fn parse(&self) -> Result<LogoRef, ValidationError> {
        LogoRef::new(&self.reference, self.shape.unwrap_or_default())
    }
}

fn parse_links(links: &[LinkForm]) -> Result<Links, ValidationError> {
    Links::parse(links.iter().map(|link| (&link.name, &link.url)))
}

/// Get all collections of the caller
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/collections
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "id": "<uuid>", "shortCode": "ab3kq9x" ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(store): Extension<CollectionStore<S>>,
    Extension(public_url): Extension<PublicUrl>,
    caller: Caller,
) -> Result<Success<Vec<CollectionResponse>>, Error> {
    let collections = store.list_by_owner(&caller).await?;

    Ok(Success::ok(CollectionResponse::from_collection_multiple(
        collections,
        &public_url,
    )))
}

/// Get a single collection of the caller
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/collections/<uuid>
/// ```
pub async fn single<S: Storage>(
    Extension(gateway): Extension<OwnershipGateway<S>>,
    Extension(public_url): Extension<PublicUrl>,
    caller: Caller,
    PathParameters(collection_id): PathParameters<Uuid>,
) -> Result<Success<CollectionResponse>, Error> {
    let authorized = gateway.authorize(&caller, &collection_id).await?;

    Ok(Success::ok(CollectionResponse::from_collection(
        authorized.into_collection(),
        &public_url,
    )))
}

/// Create collection form
#[derive(Debug, Deserialize)]
pub struct CreateCollectionForm {
    /// Optional title, trimmed and normalized
    title: Option<String>,

    /// Optional logo
    logo: Option<LogoForm>,

    /// Up to ten links
    #[serde(default)]
    links: Vec<LinkForm>,
}

impl CreateCollectionForm {
    fn parse(&self) -> Result<CollectionDraft, ValidationError> {
        Ok(CollectionDraft {
            title: self.title.as_deref().and_then(normalize_text),
            logo: self.logo.as_ref().map(LogoForm::parse).transpose()?,
            links: parse_links(&self.links)?,
        })
    }
}

/// Create a collection based on the [`CreateCollectionForm`] form
///
/// Anonymous callers can create collections, but can never change them afterwards
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "title": "My Links", "links": [{ "name": "Site", "url": "https://a.com" }] }' \
///     http://localhost:6000/api/collections
/// ```
///
/// Response
/// ```json
/// { "data": { "id": "<uuid>", "shortCode": "ab3kq9x", "publicUrl": "..." ... } }
/// ```
pub async fn create<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(store): Extension<CollectionStore<S>>,
    Extension(public_url): Extension<PublicUrl>,
    caller: Caller,
    Form(form): Form<CreateCollectionForm>,
) -> Result<Success<CollectionResponse>, Error> {
    let draft = form.parse()?;

    let collection = store.create(&caller, &draft).await?;

    audit_trail
        .register(AuditEntry::CreateCollection(&collection))
        .await;

    Ok(Success::created(CollectionResponse::from_collection(
        collection,
        &public_url,
    )))
}

/// Update collection form
///
/// All fields are optional and are not touched when not provided
#[derive(Debug, Deserialize)]
pub struct UpdateCollectionForm {
    /// New title, `null` or an empty title removes it
    #[serde(default, deserialize_with = "deserialize_present")]
    title: Option<Option<String>>,

    /// New logo, `null` removes it
    #[serde(default, deserialize_with = "deserialize_present")]
    logo: Option<Option<LogoForm>>,

    /// Replaces all links
    links: Option<Vec<LinkForm>>,
}

impl UpdateCollectionForm {
    fn parse(&self) -> Result<CollectionChanges, ValidationError> {
        let title = self
            .title
            .as_ref()
            .map(|title| title.as_deref().and_then(normalize_text));

        let logo = match &self.logo {
            Some(Some(logo)) => Some(Some(logo.parse()?)),
            Some(None) => Some(None),
            None => None,
        };

        let links = self.links.as_deref().map(parse_links).transpose()?;

        Ok(CollectionChanges { title, logo, links })
    }
}

/// Update a collection based on the [`UpdateCollectionForm`] form
///
/// The short code never changes, a printed code keeps working with the new links
///
/// Request:
/// ```sh
/// curl -v -XPATCH -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "links": [{ "name": "Site", "url": "https://a.com" }] }' \
///     http://localhost:6000/api/collections/<uuid>
/// ```
pub async fn update<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(store): Extension<CollectionStore<S>>,
    Extension(gateway): Extension<OwnershipGateway<S>>,
    Extension(public_url): Extension<PublicUrl>,
    caller: Caller,
    PathParameters(collection_id): PathParameters<Uuid>,
    Form(form): Form<UpdateCollectionForm>,
) -> Result<Success<CollectionResponse>, Error> {
    let changes = form.parse()?;

    let authorized = gateway.authorize(&caller, &collection_id).await?;

    let collection = store.update(authorized, &changes).await?;

    audit_trail
        .register(AuditEntry::UpdateCollection(&collection))
        .await;

    Ok(Success::ok(CollectionResponse::from_collection(
        collection,
        &public_url,
    )))
}

/// Delete a collection
///
/// The short code is retired, scanning it reports the collection as withdrawn
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/collections/<uuid>
/// ```
pub async fn delete<S: Storage>(
    audit_trail: AuditTrail<S>,
    Extension(store): Extension<CollectionStore<S>>,
    Extension(gateway): Extension<OwnershipGateway<S>>,
    caller: Caller,
    PathParameters(collection_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    let authorized = gateway.authorize(&caller, &collection_id).await?;

    let collection = store.delete(authorized).await?;

    audit_trail
        .register(AuditEntry::DeleteCollection(&collection))
        .await;

    Ok(Success::<&'static str>::no_content())
}
