//! Owner profiles
//!
//! Per-owner business details used while an owner is signed in. Initialized after
//! authentication, invalidated on logout and forgotten after being idle for a while.

use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;

use crate::links::LogoRef;
use crate::ownership::OwnerId;

/// Maximum number of profiles kept at once
const MAX_PROFILES: u64 = 10_000;

/// Business details of an owner
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Name of the business
    pub business_name: Option<String>,

    /// Default logo for new collections
    pub logo: Option<LogoRef>,
}

/// Profiles, namespaced by owner
#[derive(Clone)]
pub struct ProfileStore {
    cache: Cache<OwnerId, Profile>,
}

impl ProfileStore {
    pub fn new(time_to_idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_PROFILES)
                .time_to_idle(time_to_idle)
                .build(),
        }
    }

    /// Set the profile of an owner, replaces any previous one
    pub async fn initialize(&self, owner_id: &OwnerId, profile: Profile) {
        self.cache.insert(owner_id.clone(), profile).await;

        tracing::debug!("Initialized profile of {}", owner_id.as_str());
    }

    pub async fn get(&self, owner_id: &OwnerId) -> Option<Profile> {
        self.cache.get(owner_id).await
    }

    /// Forget the profile of an owner
    pub async fn invalidate(&self, owner_id: &OwnerId) {
        self.cache.invalidate(owner_id).await;

        tracing::debug!("Invalidated profile of {}", owner_id.as_str());
    }
}
