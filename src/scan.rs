//! Scanning
//!
//! Where every scannable image points to: `/q/{short_code}`

use axum::Extension;
use axum::http::StatusCode;

use crate::api::Error;
use crate::api::PathParameters;
use crate::api::Success;
use crate::resolver::PublicView;
use crate::resolver::Resolver;
use crate::storage::Storage;

/// Resolve a short code to the current links of its collection
///
/// `404 Not Found` for codes that were never issued, `410 Gone` for withdrawn collections
pub async fn scan<S: Storage>(
    Extension(resolver): Extension<Resolver<S>>,
    PathParameters(short_code): PathParameters<String>,
) -> Result<Success<PublicView>, Error> {
    let view = resolver.resolve(&short_code).await?;

    tracing::debug!(
        r#"Short code "{}" scanned, {} scans so far"#,
        view.short_code,
        view.scan_count
    );

    Ok(Success::ok(view))
}

/// Check a short code without counting it as a scan
///
/// Link previews and uptime checks use `HEAD`, only visits are scans
pub async fn head<S: Storage>(
    Extension(resolver): Extension<Resolver<S>>,
    PathParameters(short_code): PathParameters<String>,
) -> Result<StatusCode, Error> {
    resolver.check(&short_code).await?;

    Ok(StatusCode::OK)
}

/// Everything else
pub async fn not_found() -> Error {
    Error::not_found("Not found")
}
