//! Public URL API endpoint

use axum::Extension;
use serde::Serialize;

use crate::public_url::PublicUrl;
use crate::short_code::normalize_short_code;

use super::Error;
use super::PathParameters;
use super::Success;

/// The URL to put in a scannable image
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUrlResponse {
    /// Normalized short code
    pub short_code: String,

    /// Canonical scan URL
    pub url: String,
}

/// Get the public URL of a short code
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/public-url/ab3kq9x
/// ```
///
/// Response:
/// ```json
/// { "data": { "shortCode": "ab3kq9x", "url": "http://localhost:6000/q/ab3kq9x" } }
/// ```
pub async fn single(
    Extension(public_url): Extension<PublicUrl>,
    PathParameters(short_code): PathParameters<String>,
) -> Result<Success<PublicUrlResponse>, Error> {
    let short_code = normalize_short_code(&short_code)
        .ok_or_else(|| Error::bad_request("Invalid short code"))?;

    Ok(Success::ok(PublicUrlResponse {
        url: public_url.for_short_code(&short_code),
        short_code,
    }))
}
