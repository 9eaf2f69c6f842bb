#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use axum_client_ip::ClientIpSource;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::router;
use crate::collection_store::CollectionStore;
use crate::config::Config;
use crate::ownership::OwnershipGateway;
use crate::profiles::ProfileStore;
use crate::resolver::Resolver;
use crate::storage::Memory;
use crate::storage::Postgres;
use crate::storage::Storage;

mod api;
mod client_ip;
mod collection_store;
mod collections;
mod config;
mod graceful_shutdown;
mod links;
mod ownership;
mod profiles;
mod public_url;
mod resolver;
mod scan;
mod short_code;
mod storage;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "linkshelf=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;

    let app = setup_app(&config).await?;

    let listener = TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown::handler())
    .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Database connection
/// - Database migrations
pub async fn setup_app(config: &Config) -> Result<Router> {
    if let Some(database_url) = &config.database_url {
        let storage = Postgres::connect(database_url).await?;

        Ok(create_router(storage, config))
    } else {
        tracing::warn!("`DATABASE_URL` is not set, collections are kept in memory only");

        Ok(create_router(Memory::new(), config))
    }
}

/// Create the router for Linkshelf
fn create_router<S: Storage>(storage: S, config: &Config) -> Router {
    let collection_store = CollectionStore::new(storage.clone(), config.allocator.clone());
    let gateway = OwnershipGateway::new(storage.clone());
    let resolver = Resolver::new(storage.clone());
    let profiles = ProfileStore::new(config.profile_ttl);
    let jwt_keys = JwtKeys::new(config.jwt_secret.as_bytes());

    Router::new()
        .nest("/api", router::<S>())
        .route(
            "/q/{short_code}",
            get(scan::scan::<S>).head(scan::head::<S>),
        )
        .fallback(scan::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(collection_store))
        .layer(Extension(gateway))
        .layer(Extension(resolver))
        .layer(Extension(config.public_url.clone()))
        .layer(Extension(profiles))
        .layer(Extension(jwt_keys))
        .layer(Extension(ClientIpSource::ConnectInfo))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
