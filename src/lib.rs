//! # dotypos-rs
//!
//! An async Rust client for the Dotypos (Dotykačka) cloud point-of-sale API.
//!
//! The client authenticates with a bearer access token and renews it
//! through a caller-supplied [`TokenErrorHandler`] whenever the API reports
//! it as expired. Listing endpoints are exposed as a single lazy
//! [`PaginatedStream`] of records: pages are requested only as the stream
//! is consumed.
//!
//! ## Features
//!
//! - **Token renewal**: one renewal and retry per request, never a loop
//! - **Lazy pagination**: `futures` streams spanning every page, in order
//! - **Filters**: `field|op|value` filters, sorting and page size
//! - **Typed or raw records**: decode into your own types or keep JSON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures_util::TryStreamExt;
//! use dotypos_rs::{Credentials, DotyposClient, Query, Record, RenewAndPersist};
//!
//! #[tokio::main]
//! async fn main() -> dotypos_rs::Result<()> {
//!     let handler = RenewAndPersist::new(|cloud_id: &dotypos_rs::CloudId, token: &str| {
//!         // Store the token so the next run can reuse it
//!         println!("new token for {cloud_id}: {} chars", token.len());
//!     });
//!
//!     let client = DotyposClient::new(Credentials::from_env()?, handler)?;
//!
//!     if !client.valid_credentials().await? {
//!         eprintln!("credentials rejected");
//!         return Ok(());
//!     }
//!
//!     let categories: Vec<Record> = client.categories().list(Query::new()).try_collect().await?;
//!     println!("Found {} categories", categories.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, RenewAccessToken, RenewAndPersist, TokenErrorHandler};
pub use client::{ClientConfig, DotyposClient, PaginatedStream};
pub use error::{Error, Result};
pub use models::{ApiResponse, CloudId, Query, Record};

/// Prelude module for convenient imports.
///
/// ```rust
/// use dotypos_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{Credentials, RenewAccessToken, RenewAndPersist, TokenErrorHandler};
    pub use crate::client::{ClientConfig, DotyposClient, PaginatedStream};
    pub use crate::error::{Error, Result};
    pub use crate::models::{ApiResponse, CloudId, Query, Record};
}
