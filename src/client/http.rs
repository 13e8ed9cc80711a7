//! HTTP client implementation for the Dotypos API.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{BranchesService, CategoriesService, ProductsService};
use crate::auth::{signin, Credentials, TokenErrorHandler};
use crate::models::{ApiResponse, CloudId, Query};
use crate::{Error, Result};

use super::config::ClientConfig;
use super::paginated::PaginatedStream;

/// Token renewals allowed per logical request.
const MAX_TOKEN_RENEWALS: u32 = 1;

/// Resource used to check that the credentials work.
const CREDENTIALS_PROBE: &str = "branches";

/// The main client for interacting with the Dotypos API.
///
/// The client owns the credentials and the token-error handler. Cloning is
/// cheap and clones share the same token state.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use dotypos_rs::{Credentials, DotyposClient, Query, RenewAccessToken};
///
/// # async fn example() -> dotypos_rs::Result<()> {
/// let client = DotyposClient::new(Credentials::from_env()?, RenewAccessToken)?;
///
/// let mut products = client.products().list(Query::new().filter("deleted", "eq", false));
/// println!("{} products", products.size().await?);
///
/// while let Some(product) = products.try_next().await? {
///     println!("{}", product["name"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DotyposClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: Credentials,
    pub(crate) handler: Arc<dyn TokenErrorHandler>,
    pub(crate) config: ClientConfig,
}

/// Outcome of a single request attempt.
enum Attempt {
    Completed(ApiResponse),
    AccessTokenExpired,
}

impl DotyposClient {
    /// Create a client against the production API.
    pub fn new(credentials: Credentials, handler: impl TokenErrorHandler + 'static) -> Result<Self> {
        Self::with_config(credentials, handler, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(
        credentials: Credentials,
        handler: impl TokenErrorHandler + 'static,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                credentials,
                handler: Arc::new(handler),
                config,
            }),
        })
    }

    /// Get the branches service.
    pub fn branches(&self) -> BranchesService {
        BranchesService::new(self.inner.clone())
    }

    /// Get the products service.
    pub fn products(&self) -> ProductsService {
        ProductsService::new(self.inner.clone())
    }

    /// Get the categories service.
    pub fn categories(&self) -> CategoriesService {
        CategoriesService::new(self.inner.clone())
    }

    /// Stream every record of a listing resource.
    ///
    /// `resource` is the path below `/v2/clouds/{cloudId}/` and `data_key`
    /// the response field holding the records.
    pub fn paginate<T: DeserializeOwned>(
        &self,
        resource: impl Into<String>,
        data_key: impl Into<String>,
        query: Query,
    ) -> PaginatedStream<T> {
        PaginatedStream::new(self.inner.clone(), resource, data_key, query)
    }

    /// Issue an authenticated GET and return the normalized response.
    ///
    /// Non-success statuses are returned, not raised; a 404 comes back as
    /// [`ApiResponse::no_results`].
    pub async fn get(&self, path: &str, query: &Query) -> Result<ApiResponse> {
        self.inner.get(path, query).await
    }

    /// Check whether the credentials can list branches.
    ///
    /// The usual renewal applies first. A token that is still rejected after
    /// renewal yields `Ok(false)`; an expired refresh token is an error.
    pub async fn valid_credentials(&self) -> Result<bool> {
        match self.inner.get(CREDENTIALS_PROBE, &Query::new()).await {
            Ok(response) => Ok(response.code == StatusCode::OK.as_u16()),
            Err(Error::AccessDenied { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// This does not store the token; the [`TokenErrorHandler`] returns it
    /// to the client, or call [`set_access_token`](Self::set_access_token).
    ///
    /// # Errors
    ///
    /// - [`Error::RefreshTokenExpired`] if the signin endpoint answers 401
    /// - [`Error::UnknownError`] for any other unexpected status
    pub async fn new_access_token(&self) -> Result<String> {
        signin::request_access_token(
            &self.inner.http,
            &self.inner.config.base_url,
            &self.inner.credentials,
        )
        .await
    }

    /// Get the current access token.
    pub async fn access_token(&self) -> SecretString {
        self.inner.credentials.access_token().await
    }

    /// Replace the stored access token.
    pub async fn set_access_token(&self, token: impl Into<String>) {
        self.inner.credentials.set_access_token(token).await
    }

    /// The cloud this client talks to.
    pub fn cloud_id(&self) -> &CloudId {
        self.inner.credentials.cloud_id()
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Build the URL of a resource in this client's cloud.
    fn resource_url(&self, path: &str) -> Result<Url> {
        let url = format!(
            "{}/v2/clouds/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.credentials.cloud_id(),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }

    /// Build request headers with authentication.
    fn build_headers(&self, token: &SecretString) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Make an authenticated GET request, renewing the access token at most
    /// once.
    pub(crate) async fn get(self: &Arc<Self>, path: &str, query: &Query) -> Result<ApiResponse> {
        let mut renewals_left = MAX_TOKEN_RENEWALS;

        loop {
            match self.send_get(path, query).await? {
                Attempt::Completed(response) => return Ok(response),
                Attempt::AccessTokenExpired if renewals_left > 0 => {
                    renewals_left -= 1;
                    tracing::warn!(path, "access token expired; renewing");
                    self.renew_access_token().await?;
                }
                Attempt::AccessTokenExpired => {
                    tracing::warn!(path, "access token rejected after renewal");
                    return Err(Error::AccessDenied {
                        path: path.to_string(),
                    });
                }
            }
        }
    }

    async fn send_get(&self, path: &str, query: &Query) -> Result<Attempt> {
        let url = self.resource_url(path)?;
        let token = self.credentials.access_token().await;
        let headers = self.build_headers(&token)?;

        tracing::debug!(path, page = ?query.get("page"), "GET");

        let mut request = self.http.get(url).headers(headers);
        if !query.is_empty() {
            request = request.query(query.pairs());
        }

        let response = request.send().await?;
        Self::classify(response).await
    }

    async fn classify(response: reqwest::Response) -> Result<Attempt> {
        match response.status() {
            StatusCode::FORBIDDEN => Ok(Attempt::AccessTokenExpired),
            StatusCode::NOT_FOUND => Ok(Attempt::Completed(ApiResponse::no_results())),
            status => {
                let text = response.text().await?;
                let body = if text.trim().is_empty() {
                    serde_json::Value::Null
                } else {
                    serde_json::from_str(&text)?
                };
                Ok(Attempt::Completed(ApiResponse::new(status.as_u16(), body)))
            }
        }
    }

    /// Ask the handler for a new token and store it.
    async fn renew_access_token(self: &Arc<Self>) -> Result<()> {
        let client = DotyposClient {
            inner: Arc::clone(self),
        };
        let token = self.handler.on_token_error(&client).await?;
        self.credentials.set_access_token(token).await;
        Ok(())
    }
}

impl Clone for DotyposClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for DotyposClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotyposClient")
            .field("credentials", &self.inner.credentials)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RenewAccessToken;

    fn client(base_url: &str) -> DotyposClient {
        DotyposClient::with_config(
            Credentials::new("336474017", "refresh-value", "access-value"),
            RenewAccessToken,
            ClientConfig::new().with_base_url(base_url),
        )
        .unwrap()
    }

    #[test]
    fn test_resource_url() {
        let client = client("https://api.dotykacka.cz");
        let url = client.inner.resource_url("products").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dotykacka.cz/v2/clouds/336474017/products"
        );

        let url = client.inner.resource_url("/branches").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dotykacka.cz/v2/clouds/336474017/branches"
        );
    }

    #[test]
    fn test_headers() {
        let client = client("https://api.dotykacka.cz");
        let headers = client
            .inner
            .build_headers(&SecretString::from("abc".to_string()))
            .unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[test]
    fn test_header_rejects_invalid_token() {
        let client = client("https://api.dotykacka.cz");
        let result = client
            .inner
            .build_headers(&SecretString::from("bad\ntoken".to_string()));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug_str = format!("{:?}", client("https://api.dotykacka.cz"));
        assert!(!debug_str.contains("access-value"));
        assert!(!debug_str.contains("refresh-value"));
        assert!(debug_str.contains("REDACTED"));
    }
}
