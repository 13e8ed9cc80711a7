//! API service modules for Dotypos listing endpoints.
//!
//! Each service wraps one resource of the cloud and hands out
//! [`PaginatedStream`](crate::client::PaginatedStream)s over it. Resources
//! without a dedicated service can be listed with
//! [`DotyposClient::paginate`](crate::DotyposClient::paginate).

mod branches;
mod categories;
mod products;

pub use branches::BranchesService;
pub use categories::CategoriesService;
pub use products::ProductsService;
