//! Product Service - Business logic layer

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductDto, ProductFilter, SearchRequest, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validates inputs, maps between transport DTOs and the entity, and
/// delegates persistence to the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List every product in the catalog
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<ProductDto>> {
        let products = self.repository.list_all().await?;
        Ok(products.into_iter().map(Product::into_dto).collect())
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<ProductDto> {
        self.repository
            .get_by_id(id)
            .await?
            .map(Product::into_dto)
            .ok_or(ProductError::NotFound(id))
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let created = self.repository.add(Product::from_create(input)).await?;
        Ok(created.into_dto())
    }

    /// Partially update an existing product
    ///
    /// Only fields present in the request overwrite the stored values. A
    /// repository update that reports failure (a race with a concurrent
    /// delete) surfaces the same way as a record that never existed.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let mut updated = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        updated.apply_update(input);

        if !self.repository.update(updated).await? {
            return Err(ProductError::NotFound(id));
        }

        // Re-read so the response carries the repository-stamped updated_at.
        self.repository
            .get_by_id(id)
            .await?
            .map(Product::into_dto)
            .ok_or(ProductError::NotFound(id))
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    /// Search products by free-text query and/or category
    ///
    /// Only query and category reach the repository filter; the richer
    /// filter fields stay unset in the public contract.
    #[instrument(skip(self, request))]
    pub async fn search_products(&self, request: SearchRequest) -> ProductResult<Vec<ProductDto>> {
        let filter = ProductFilter {
            query: request.query,
            category: request.category,
            ..Default::default()
        };

        let products = self.repository.search(&filter).await?;
        Ok(products.into_iter().map(Product::into_dto).collect())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::Sequence;

    use super::*;
    use crate::repository::MockProductRepository;

    fn stored_product(id: Uuid) -> Product {
        Product {
            id,
            name: "Laptop".to_string(),
            description: Some("fast".to_string()),
            price: 1200.0,
            category: "Electronics".to_string(),
            tags: vec!["computers".to_string()],
            in_stock: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_price() {
        let repo = MockProductRepository::new();
        let service = ProductService::new(repo);

        let result = service
            .create_product(CreateProduct {
                name: "Laptop".to_string(),
                description: None,
                price: -1.0,
                category: "Electronics".to_string(),
                tags: vec![],
                in_stock: true,
            })
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_delegates_to_repository() {
        let mut repo = MockProductRepository::new();
        let id = Uuid::new_v4();
        repo.expect_add()
            .withf(|p| p.id.is_nil() && p.name == "Laptop")
            .returning(move |mut p| {
                p.id = id;
                Ok(p)
            });
        let service = ProductService::new(repo);

        let dto = service
            .create_product(CreateProduct {
                name: "Laptop".to_string(),
                description: None,
                price: 1200.0,
                category: "Electronics".to_string(),
                tags: vec![],
                in_stock: true,
            })
            .await
            .unwrap();

        assert_eq!(dto.id, id);
        assert_eq!(dto.name, "Laptop");
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        let service = ProductService::new(repo);

        let result = service.get_product(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_product_applies_only_supplied_fields() {
        let id = Uuid::new_v4();
        let existing = stored_product(id);
        let created_at = existing.created_at;

        let mut repo = MockProductRepository::new();
        let mut seq = Sequence::new();

        let for_first_get = existing.clone();
        repo.expect_get_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(for_first_get.clone())));

        repo.expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |p| {
                p.id == id && p.price == 10.0 && p.name == "Laptop" && p.created_at == created_at
            })
            .returning(|_| Ok(true));

        let mut after = existing.clone();
        after.price = 10.0;
        after.updated_at = Some(Utc::now());
        let for_second_get = after.clone();
        repo.expect_get_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(for_second_get.clone())));

        let service = ProductService::new(repo);
        let dto = service
            .update_product(
                id,
                UpdateProduct {
                    price: Some(10.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.price, 10.0);
        assert_eq!(dto.name, "Laptop");
        assert_eq!(dto.created_at, created_at);
        assert!(dto.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_product_lost_race_reports_not_found() {
        let id = Uuid::new_v4();
        let existing = stored_product(id);

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().returning(|_| Ok(false));

        let service = ProductService::new(repo);
        let result = service
            .update_product(
                id,
                UpdateProduct {
                    price: Some(10.0),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_delete_product_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(false));
        let service = ProductService::new(repo);

        let result = service.delete_product(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_product_success() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(true));
        let service = ProductService::new(repo);

        assert!(service.delete_product(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_search_populates_only_query_and_category() {
        let mut repo = MockProductRepository::new();
        repo.expect_search()
            .withf(|f| {
                f.query.as_deref() == Some("lap")
                    && f.category.as_deref() == Some("Electronics")
                    && f.min_price.is_none()
                    && f.max_price.is_none()
                    && f.in_stock.is_none()
                    && f.tags.is_none()
            })
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(repo);
        let results = service
            .search_products(SearchRequest {
                query: Some("lap".to_string()),
                category: Some("Electronics".to_string()),
            })
            .await
            .unwrap();

        assert!(results.is_empty());
    }
}
