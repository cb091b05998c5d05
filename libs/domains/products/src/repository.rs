use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductFilter};

/// Repository trait for Product persistence
///
/// Two interchangeable backends implement this: an in-memory concurrent map
/// and MongoDB. Both must produce observably identical results for every
/// operation given identical inputs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Return every stored product; no ordering guarantee beyond stable
    /// backend iteration.
    async fn list_all(&self) -> ProductResult<Vec<Product>>;

    /// Get a product by id. Not-found is `None`, never an error.
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Store a new product. Assigns an id when the caller supplied a nil one
    /// and stamps `created_at`. An id collision is a distinct
    /// [`ProductError::Conflict`](crate::error::ProductError::Conflict).
    async fn add(&self, product: Product) -> ProductResult<Product>;

    /// Replace a stored product, preserving its original `created_at` and
    /// stamping `updated_at`. Returns `Ok(false)` when the id is absent.
    async fn update(&self, product: Product) -> ProductResult<bool>;

    /// Delete by id. Returns `Ok(false)` when the id is absent.
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Return products matching every supplied filter (filters AND).
    async fn search(&self, filter: &ProductFilter) -> ProductResult<Vec<Product>>;
}
