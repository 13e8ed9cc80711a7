//! HTTP client and service layer for the Dotypos API.
//!
//! This module provides the main entry point [`DotyposClient`], the
//! authenticated request executor behind it, and the lazy
//! [`PaginatedStream`] used by every listing.
//!
//! # Example
//!
//! ```no_run
//! use dotypos_rs::{ClientConfig, Credentials, DotyposClient, RenewAccessToken};
//! use std::time::Duration;
//!
//! # async fn example() -> dotypos_rs::Result<()> {
//! let client = DotyposClient::with_config(
//!     Credentials::new("336474017", "refresh-token", "access-token"),
//!     RenewAccessToken,
//!     ClientConfig::default().with_timeout(Duration::from_secs(10)),
//! )?;
//!
//! let mut branches = client.branches().list(Default::default());
//! println!("{} branches", branches.size().await?);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use http::DotyposClient;
pub use paginated::PaginatedStream;
pub(crate) use http::ClientInner;
