//! All API endpoint setup

use axum::Router;
use axum::routing::get;

pub use audit_trail::AuditTrail;
pub use caller::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::deserialize_present;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod audit_trail;
mod caller;
mod collections;
mod profile;
mod public_url;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    Router::new()
        .route(
            "/collections",
            get(collections::list::<S>).post(collections::create::<S>),
        )
        .route(
            "/collections/{collection}",
            get(collections::single::<S>)
                .patch(collections::update::<S>)
                .delete(collections::delete::<S>),
        )
        .route("/public-url/{short_code}", get(public_url::single))
        .route(
            "/profile",
            get(profile::single)
                .put(profile::initialize)
                .delete(profile::invalidate),
        )
}
