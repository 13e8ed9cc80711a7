//! Categories service.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::paginated::PaginatedStream;
use crate::client::ClientInner;
use crate::models::{Query, Record, DEFAULT_DATA_KEY};

/// Path of the categories resource.
const RESOURCE: &str = "categories";

/// Service for product categories.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use dotypos_rs::{Query, Record};
///
/// # async fn example(client: dotypos_rs::DotyposClient) -> dotypos_rs::Result<()> {
/// let visible: Vec<Record> = client
///     .categories()
///     .list(Query::new().filter("display", "eq", true).sort("name"))
///     .try_collect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct CategoriesService {
    inner: Arc<ClientInner>,
}

impl CategoriesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Stream all categories matching `query`.
    pub fn list(&self, query: Query) -> PaginatedStream<Record> {
        self.list_as(query)
    }

    /// Stream all categories matching `query`, decoded into `T`.
    pub fn list_as<T: DeserializeOwned>(&self, query: Query) -> PaginatedStream<T> {
        PaginatedStream::new(self.inner.clone(), RESOURCE, DEFAULT_DATA_KEY, query)
    }
}
