//! Branches service.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::paginated::PaginatedStream;
use crate::client::ClientInner;
use crate::models::{Query, Record, DEFAULT_DATA_KEY};

/// Path of the branches resource.
const RESOURCE: &str = "branches";

/// Service for the branches (points of sale) of a cloud.
pub struct BranchesService {
    inner: Arc<ClientInner>,
}

impl BranchesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Stream all branches matching `query`.
    pub fn list(&self, query: Query) -> PaginatedStream<Record> {
        self.list_as(query)
    }

    /// Stream all branches matching `query`, decoded into `T`.
    pub fn list_as<T: DeserializeOwned>(&self, query: Query) -> PaginatedStream<T> {
        PaginatedStream::new(self.inner.clone(), RESOURCE, DEFAULT_DATA_KEY, query)
    }
}
