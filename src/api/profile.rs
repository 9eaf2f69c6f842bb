//! Profile API endpoints
//!
//! Business details of the signed-in owner. Set after signing in, removed on signing out.

use axum::Extension;
use serde::Deserialize;

use crate::links::normalize_text;
use crate::ownership::Caller;
use crate::ownership::OwnerId;
use crate::profiles::Profile;
use crate::profiles::ProfileStore;

use super::Error;
use super::Form;
use super::Success;
use super::collections::LogoForm;

/// Profiles only exist for owners
fn require_owner(caller: Caller) -> Result<OwnerId, Error> {
    match caller {
        Caller::Owner(owner_id) => Ok(owner_id),
        Caller::Anonymous => Err(Error::forbidden("Profiles require a signed-in owner")),
    }
}

/// Get the profile of the caller
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/profile
/// ```
pub async fn single(
    Extension(profiles): Extension<ProfileStore>,
    caller: Caller,
) -> Result<Success<Profile>, Error> {
    let owner_id = require_owner(caller)?;

    profiles
        .get(&owner_id)
        .await
        .map(Success::ok)
        .ok_or_else(|| Error::not_found("Profile not initialized"))
}

/// Profile form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// Name of the business
    business_name: Option<String>,

    /// Default logo
    logo: Option<LogoForm>,
}

/// Initialize the profile of the caller, replaces an existing one
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "businessName": "Bakery" }' \
///     http://localhost:6000/api/profile
/// ```
pub async fn initialize(
    Extension(profiles): Extension<ProfileStore>,
    caller: Caller,
    Form(form): Form<ProfileForm>,
) -> Result<Success<Profile>, Error> {
    let owner_id = require_owner(caller)?;

    let profile = Profile {
        business_name: form.business_name.as_deref().and_then(normalize_text),
        logo: form.logo.as_ref().map(LogoForm::parse).transpose()?,
    };

    profiles.initialize(&owner_id, profile.clone()).await;

    Ok(Success::ok(profile))
}

/// Invalidate the profile of the caller, e.g. on signing out
///
/// Request:
/// ```sh
/// curl -v -XDELETE -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/profile
/// ```
pub async fn invalidate(
    Extension(profiles): Extension<ProfileStore>,
    caller: Caller,
) -> Result<Success<&'static str>, Error> {
    let owner_id = require_owner(caller)?;

    profiles.invalidate(&owner_id).await;

    Ok(Success::<&'static str>::no_content())
}
