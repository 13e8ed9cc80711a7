//! Access token renewal through the signin endpoint.

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

use super::Credentials;
use crate::{Error, Result};

/// Path of the signin endpoint, relative to the API base URL.
pub const SIGNIN_PATH: &str = "/v2/signin/token";

/// Exchange the refresh token for a new access token.
///
/// - 200/201: the `accessToken` from the body
/// - 401: [`Error::RefreshTokenExpired`]
/// - anything else: [`Error::UnknownError`] with status and body
pub(crate) async fn request_access_token(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<String> {
    let url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), SIGNIN_PATH))?;

    let mut authorization = HeaderValue::from_str(&format!(
        "User {}",
        credentials.refresh_token().expose_secret()
    ))
    .map_err(|_| Error::InvalidInput("Invalid refresh token format".to_string()))?;
    authorization.set_sensitive(true);

    tracing::debug!(cloud_id = %credentials.cloud_id(), "requesting new access token");

    let response = http
        .post(url)
        .header(AUTHORIZATION, authorization)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .json(&serde_json::json!({ "_cloudId": credentials.cloud_id() }))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    match status {
        StatusCode::OK | StatusCode::CREATED => {
            let parsed: Value = serde_json::from_str(&body)?;
            let token = parsed
                .get("accessToken")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::UnexpectedResponse("signin response has no accessToken".to_string())
                })?;
            tracing::info!(cloud_id = %credentials.cloud_id(), "access token renewed");
            Ok(token.to_string())
        }
        StatusCode::UNAUTHORIZED => {
            tracing::warn!(cloud_id = %credentials.cloud_id(), "refresh token rejected");
            Err(Error::RefreshTokenExpired)
        }
        _ => Err(Error::UnknownError {
            status: status.as_u16(),
            body,
        }),
    }
}
