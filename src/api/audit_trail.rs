//! Audit trail service

use std::net::IpAddr;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::client_ip::ClientIp;
use crate::ownership::Caller;
use crate::storage::AuditEntry;
use crate::storage::Storage;

use super::Error;

/// Audit trail service
pub struct AuditTrail<S: Storage> {
    /// Storage in where the trail is saved
    storage: S,

    /// The caller for the audit trail
    caller: Caller,

    /// The IP address associated with the audit trail
    ip_address: Option<IpAddr>,
}

impl<S: Storage> AuditTrail<S> {
    /// Register an entry on the audit trail
    ///
    /// A failure is logged, the action itself already happened
    pub async fn register(&self, entry: AuditEntry<'_>) {
        let result = self
            .storage
            .register_audit_trail(self.caller.owner_id(), &entry, self.ip_address.as_ref())
            .await;

        if let Err(err) = result {
            tracing::error!(
                "Could not register audit trail entry for collection {}: {err}",
                entry.collection().id
            );
        }
    }
}

impl<B, S: Storage> FromRequestParts<B> for AuditTrail<S>
where
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        let Extension(storage) = parts
            .extract::<Extension<S>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get a storage pool"))?;

        let caller = Caller::from_request_parts(parts, state).await?;

        let Ok(ip_address) = Option::<ClientIp>::from_request_parts(parts, state).await;

        Ok(AuditTrail {
            storage,
            caller,
            ip_address: ip_address.map(|ClientIp(ip_address)| ip_address),
        })
    }
}
