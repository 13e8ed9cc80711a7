//! Credentials for the Dotypos API.

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use crate::models::CloudId;
use crate::{Error, Result};

/// Environment variable holding the cloud id.
pub const CLOUD_ID_ENV: &str = "DOTYPOS_CLOUD_ID";
/// Environment variable holding the refresh token.
pub const REFRESH_TOKEN_ENV: &str = "DOTYPOS_REFRESH_TOKEN";
/// Environment variable holding a previously issued access token.
pub const ACCESS_TOKEN_ENV: &str = "DOTYPOS_ACCESS_TOKEN";

/// Credentials owned by a single [`DotyposClient`](crate::DotyposClient).
///
/// The refresh token never changes for the life of the client. The access
/// token is replaced in place whenever the token-error handler supplies a
/// new one.
///
/// `Credentials` is not `Clone`; each client owns its own
/// token state.
pub struct Credentials {
    cloud_id: CloudId,
    refresh_token: SecretString,
    access_token: RwLock<SecretString>,
}

impl Credentials {
    /// Create credentials from a cloud id, a refresh token and the last
    /// known access token.
    ///
    /// The access token may be empty; the first request then fails with an
    /// expired token and triggers a renewal.
    ///
    /// # Example
    ///
    /// ```
    /// use dotypos_rs::Credentials;
    ///
    /// let credentials = Credentials::new("336474017", "refresh-token", "");
    /// assert_eq!(credentials.cloud_id().as_str(), "336474017");
    /// ```
    pub fn new(
        cloud_id: impl Into<CloudId>,
        refresh_token: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            cloud_id: cloud_id.into(),
            refresh_token: SecretString::from(refresh_token.into()),
            access_token: RwLock::new(SecretString::from(access_token.into())),
        }
    }

    /// Read credentials from `DOTYPOS_CLOUD_ID`, `DOTYPOS_REFRESH_TOKEN`
    /// and the optional `DOTYPOS_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{name} must be set")))
        };

        let cloud_id = required(CLOUD_ID_ENV)?;
        let refresh_token = required(REFRESH_TOKEN_ENV)?;
        let access_token = lookup(ACCESS_TOKEN_ENV).unwrap_or_default();

        Ok(Self::new(cloud_id, refresh_token, access_token))
    }

    /// The cloud these credentials belong to.
    pub fn cloud_id(&self) -> &CloudId {
        &self.cloud_id
    }

    pub(crate) fn refresh_token(&self) -> &SecretString {
        &self.refresh_token
    }

    /// Get the current access token.
    pub async fn access_token(&self) -> SecretString {
        self.access_token.read().await.clone()
    }

    /// Replace the access token.
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = SecretString::from(token.into());
    }

    /// Returns `true` if a non-empty access token is stored.
    pub async fn has_access_token(&self) -> bool {
        !self.access_token.read().await.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("cloud_id", &self.cloud_id)
            .field("refresh_token", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_credentials_debug_redacts_tokens() {
        let credentials = Credentials::new("42", "super-secret-refresh", "super-secret-access");
        let debug_str = format!("{:?}", credentials);

        assert!(!debug_str.contains("super-secret-refresh"));
        assert!(!debug_str.contains("super-secret-access"));
        assert!(debug_str.contains("REDACTED"));
        assert!(debug_str.contains("42"));
    }

    #[tokio::test]
    async fn test_access_token_replaced_in_place() {
        let credentials = Credentials::new("42", "refresh", "old");
        assert_eq!(credentials.access_token().await.expose_secret(), "old");

        credentials.set_access_token("new").await;
        assert_eq!(credentials.access_token().await.expose_secret(), "new");
        assert_eq!(credentials.refresh_token().expose_secret(), "refresh");
    }

    #[tokio::test]
    async fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (CLOUD_ID_ENV, "336474017"),
            (REFRESH_TOKEN_ENV, "refresh"),
        ]);

        let credentials = Credentials::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .expect("credentials");

        assert_eq!(credentials.cloud_id().as_str(), "336474017");
        assert!(!credentials.has_access_token().await);
    }

    #[test]
    fn test_from_lookup_missing_refresh_token() {
        let err = Credentials::from_lookup(|name| {
            (name == CLOUD_ID_ENV).then(|| "336474017".to_string())
        })
        .unwrap_err();

        assert!(matches!(err, Error::Config(msg) if msg.contains(REFRESH_TOKEN_ENV)));
    }
}
