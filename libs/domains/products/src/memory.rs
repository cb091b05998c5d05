//! In-memory implementation of ProductRepository
//!
//! Backed by a concurrent map with per-key atomic entry operations; no
//! whole-store lock, no cross-key transactions. Data does not survive a
//! process restart.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{sample_products, Product, ProductFilter};
use crate::repository::ProductRepository;

/// In-memory product store seeded with three sample records.
pub struct InMemoryProductRepository {
    items: DashMap<Uuid, Product>,
}

impl InMemoryProductRepository {
    /// Create a store pre-populated with the sample catalog.
    pub fn new() -> Self {
        let repo = Self::empty();
        for product in sample_products() {
            repo.items.insert(product.id, product);
        }
        repo
    }

    /// Create an empty store. Used by tests that need a clean slate.
    pub fn empty() -> Self {
        Self {
            items: DashMap::new(),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        Ok(self.items.iter().map(|e| e.value().clone()).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.items.get(&id).map(|e| e.value().clone()))
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn add(&self, mut product: Product) -> ProductResult<Product> {
        if product.id.is_nil() {
            product.id = Uuid::new_v4();
        }
        product.created_at = Utc::now();
        product.updated_at = None;

        match self.items.entry(product.id) {
            Entry::Occupied(_) => Err(ProductError::Conflict(product.id)),
            Entry::Vacant(vacant) => {
                vacant.insert(product.clone());
                tracing::info!(product_id = %product.id, "Product created");
                Ok(product)
            }
        }
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, mut product: Product) -> ProductResult<bool> {
        match self.items.entry(product.id) {
            Entry::Occupied(mut occupied) => {
                product.created_at = occupied.get().created_at;
                product.updated_at = Some(Utc::now());
                occupied.insert(product);
                Ok(true)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let removed = self.items.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self, filter))]
    async fn search(&self, filter: &ProductFilter) -> ProductResult<Vec<Product>> {
        Ok(self
            .items
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect())
    }
}
