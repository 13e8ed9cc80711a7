//! Authentication for the Dotypos API.
//!
//! Requests carry a short-lived access token. When the API rejects it, the
//! client asks a [`TokenErrorHandler`] for a replacement, stores it and
//! repeats the request once. The handler usually calls
//! [`DotyposClient::new_access_token`](crate::DotyposClient::new_access_token),
//! which exchanges the long-lived refresh token at the signin endpoint.
//!
//! ```no_run
//! use dotypos_rs::{Credentials, DotyposClient, RenewAccessToken};
//!
//! # async fn example() -> dotypos_rs::Result<()> {
//! let credentials = Credentials::new("336474017", "refresh-token", "");
//! let client = DotyposClient::new(credentials, RenewAccessToken)?;
//!
//! // The empty access token is rejected, renewed, and the call retried.
//! assert!(client.valid_credentials().await?);
//! # Ok(())
//! # }
//! ```
//!
//! A rejected refresh token surfaces as
//! [`Error::RefreshTokenExpired`](crate::Error::RefreshTokenExpired); the
//! application has to obtain new credentials.

mod credentials;
mod handler;
pub(crate) mod signin;

pub use credentials::{Credentials, ACCESS_TOKEN_ENV, CLOUD_ID_ENV, REFRESH_TOKEN_ENV};
pub use handler::{RenewAccessToken, RenewAndPersist, TokenErrorHandler};
pub use signin::SIGNIN_PATH;
