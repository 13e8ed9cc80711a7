//! Products service.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::paginated::PaginatedStream;
use crate::client::ClientInner;
use crate::models::{Query, Record, DEFAULT_DATA_KEY};

/// Path of the products resource.
const RESOURCE: &str = "products";

/// Service for the product catalogue.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use serde::Deserialize;
/// use dotypos_rs::Query;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Product {
///     id: String,
///     name: String,
///     price_with_vat: Option<f64>,
/// }
///
/// # async fn example(client: dotypos_rs::DotyposClient) -> dotypos_rs::Result<()> {
/// let mut products = client
///     .products()
///     .list_as::<Product>(Query::new().filter("deleted", "eq", false));
///
/// while let Some(product) = products.next().await {
///     let product = product?;
///     println!("{} {} {:?}", product.id, product.name, product.price_with_vat);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ProductsService {
    inner: Arc<ClientInner>,
}

impl ProductsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Stream all products matching `query`.
    ///
    /// Pages are requested as the stream is consumed.
    pub fn list(&self, query: Query) -> PaginatedStream<Record> {
        self.list_as(query)
    }

    /// Stream all products matching `query`, decoded into `T`.
    pub fn list_as<T: DeserializeOwned>(&self, query: Query) -> PaginatedStream<T> {
        PaginatedStream::new(self.inner.clone(), RESOURCE, DEFAULT_DATA_KEY, query)
    }
}
