//! Token-error handlers.

use async_trait::async_trait;

use crate::models::CloudId;
use crate::{DotyposClient, Result};

/// Called when the API rejects the current access token.
///
/// The handler receives the client so it can call
/// [`DotyposClient::new_access_token`]. It returns the token to use from
/// now on; the client stores it and repeats the rejected request once.
/// Any error returned here is passed to the caller unchanged.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use dotypos_rs::{DotyposClient, TokenErrorHandler};
///
/// struct LoggingRenewal;
///
/// #[async_trait]
/// impl TokenErrorHandler for LoggingRenewal {
///     async fn on_token_error(&self, client: &DotyposClient) -> dotypos_rs::Result<String> {
///         println!("renewing token for cloud {}", client.cloud_id());
///         client.new_access_token().await
///     }
/// }
/// ```
#[async_trait]
pub trait TokenErrorHandler: Send + Sync {
    /// Obtain a replacement access token.
    async fn on_token_error(&self, client: &DotyposClient) -> Result<String>;
}

/// Renews the access token through the signin endpoint and keeps it in
/// memory only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenewAccessToken;

#[async_trait]
impl TokenErrorHandler for RenewAccessToken {
    async fn on_token_error(&self, client: &DotyposClient) -> Result<String> {
        client.new_access_token().await
    }
}

/// Renews the access token, then hands it to a closure for external
/// storage before the client uses it.
///
/// # Example
///
/// ```
/// use dotypos_rs::{CloudId, RenewAndPersist};
///
/// let handler = RenewAndPersist::new(|cloud_id: &CloudId, token: &str| {
///     println!("store token for {cloud_id} ({} bytes)", token.len());
/// });
/// ```
pub struct RenewAndPersist<F> {
    persist: F,
}

impl<F> RenewAndPersist<F>
where
    F: Fn(&CloudId, &str) + Send + Sync,
{
    /// Create a handler that calls `persist` with every renewed token.
    pub fn new(persist: F) -> Self {
        Self { persist }
    }
}

#[async_trait]
impl<F> TokenErrorHandler for RenewAndPersist<F>
where
    F: Fn(&CloudId, &str) + Send + Sync,
{
    async fn on_token_error(&self, client: &DotyposClient) -> Result<String> {
        let token = client.new_access_token().await?;
        (self.persist)(client.cloud_id(), &token);
        Ok(token)
    }
}

impl<F> std::fmt::Debug for RenewAndPersist<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenewAndPersist").finish_non_exhaustive()
    }
}
