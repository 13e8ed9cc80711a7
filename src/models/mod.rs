//! Data models for the Dotypos API.
//!
//! - [`primitives`] - `CloudId` and the opaque `Record` type
//! - [`query`] - query parameters for listing endpoints
//! - [`response`] - normalized listing responses

pub mod primitives;
pub mod query;
pub mod response;

pub use primitives::*;
pub use query::*;
pub use response::*;
