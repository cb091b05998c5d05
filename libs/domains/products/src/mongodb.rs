//! MongoDB implementation of ProductRepository
//!
//! One document per product. Documents are addressed by `_id` plus
//! `category` (the partition key), so update and delete perform a point read
//! first to learn the stored category. Not-found outcomes are plain results,
//! never errors; only driver failures surface as
//! [`ProductError::Database`](crate::error::ProductError::Database).

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document, Regex},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{normalized, sample_products, Product, ProductFilter};
use crate::repository::ProductRepository;

/// MongoDB-backed product store.
pub struct MongoProductRepository {
    db: Database,
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a repository over the default `products` collection.
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "products")
    }

    /// Create a repository over a custom collection name.
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Idempotent startup initialization.
    ///
    /// Ensures the collection and its indexes exist. The sample catalog is
    /// seeded only when the collection was just created, so rerunning init
    /// never duplicates records.
    #[instrument(skip(self))]
    pub async fn init(&self) -> ProductResult<()> {
        let name = self.collection.name().to_string();
        let existing = self.db.list_collection_names().await?;
        let just_created = !existing.contains(&name);

        if just_created {
            self.db.create_collection(&name).await?;
        }

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "category": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().name("idx_name".to_string()).build())
                .build(),
        ];
        self.collection.create_indexes(indexes).await?;

        if just_created {
            self.collection.insert_many(sample_products()).await?;
            tracing::info!(collection = %name, "Seeded sample catalog");
        }

        Ok(())
    }

    /// Build a MongoDB query document from a ProductFilter.
    ///
    /// Must express the same predicates as [`ProductFilter::matches`].
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(query) = normalized(filter.query.as_deref()) {
            let pattern = regex::escape(query);
            doc.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": &pattern, "$options": "i" } },
                    doc! { "description": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }

        if let Some(category) = normalized(filter.category.as_deref()) {
            doc.insert(
                "category",
                doc! {
                    "$regex": format!("^{}$", regex::escape(category)),
                    "$options": "i"
                },
            );
        }

        if filter.min_price.is_some() || filter.max_price.is_some() {
            let mut price_filter = doc! {};
            if let Some(min) = filter.min_price {
                price_filter.insert("$gte", min);
            }
            if let Some(max) = filter.max_price {
                price_filter.insert("$lte", max);
            }
            doc.insert("price", price_filter);
        }

        if let Some(in_stock) = filter.in_stock {
            doc.insert("inStock", in_stock);
        }

        // Any supplied tag may match, case-insensitively.
        if let Some(ref tags) = filter.tags {
            if !tags.is_empty() {
                let patterns: Vec<Bson> = tags
                    .iter()
                    .map(|t| {
                        Bson::RegularExpression(Regex {
                            pattern: format!("^{}$", regex::escape(t)),
                            options: "i".to_string(),
                        })
                    })
                    .collect();
                doc.insert("tags", doc! { "$in": patterns });
            }
        }

        doc
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    /// Point filter addressing a document by id and partition key.
    fn point_filter(id: Uuid, category: &str) -> Document {
        doc! {
            "_id": to_bson(&id).unwrap_or(Bson::Null),
            "category": category,
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn add(&self, mut product: Product) -> ProductResult<Product> {
        if product.id.is_nil() {
            product.id = Uuid::new_v4();
        } else if self
            .collection
            .find_one(Self::id_filter(product.id))
            .await?
            .is_some()
        {
            return Err(ProductError::Conflict(product.id));
        }
        product.created_at = Utc::now();
        product.updated_at = None;

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, mut product: Product) -> ProductResult<bool> {
        // Point read to learn the stored partition key and created_at.
        let Some(existing) = self.collection.find_one(Self::id_filter(product.id)).await? else {
            return Ok(false);
        };

        product.created_at = existing.created_at;
        product.updated_at = Some(Utc::now());

        let result = self
            .collection
            .replace_one(Self::point_filter(product.id, &existing.category), &product)
            .await?;

        // A concurrent delete between the read and the replace shows up as
        // zero matches; report it the same as never-existed.
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let Some(existing) = self.collection.find_one(Self::id_filter(id)).await? else {
            return Ok(false);
        };

        let result = self
            .collection
            .delete_one(Self::point_filter(id, &existing.category))
            .await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[instrument(skip(self, filter))]
    async fn search(&self, filter: &ProductFilter) -> ProductResult<Vec<Product>> {
        let query = Self::build_filter(filter);
        let cursor = self.collection.find(query).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_query_matches_name_or_description() {
        let filter = ProductFilter {
            query: Some("lap".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.contains_key("$or"));
    }

    #[test]
    fn test_build_filter_escapes_regex_metacharacters() {
        let filter = ProductFilter {
            query: Some("a.b*".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        let or = doc.get_array("$or").unwrap();
        let name_clause = or[0].as_document().unwrap().get_document("name").unwrap();
        assert_eq!(name_clause.get_str("$regex").unwrap(), "a\\.b\\*");
    }

    #[test]
    fn test_build_filter_category_is_anchored() {
        let filter = ProductFilter {
            category: Some("Electronics".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        let category = doc.get_document("category").unwrap();
        assert_eq!(category.get_str("$regex").unwrap(), "^Electronics$");
    }

    #[test]
    fn test_build_filter_blank_inputs_treated_as_absent() {
        let filter = ProductFilter {
            query: Some("  ".to_string()),
            category: Some("".to_string()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_placeholder_filters_use_wire_names() {
        let filter = ProductFilter {
            min_price: Some(10.0),
            max_price: Some(20.0),
            in_stock: Some(true),
            tags: Some(vec!["wood".to_string()]),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.contains_key("price"));
        assert!(doc.contains_key("inStock"));
        assert!(doc.contains_key("tags"));
    }

    #[test]
    fn test_build_filter_tags_match_any_case_insensitive() {
        let filter = ProductFilter {
            tags: Some(vec!["Wood".to_string(), "metal".to_string()]),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);

        let candidates = doc.get_document("tags").unwrap().get_array("$in").unwrap();
        assert_eq!(candidates.len(), 2);
        let Bson::RegularExpression(first) = &candidates[0] else {
            panic!("expected a regex tag match");
        };
        assert_eq!(first.pattern, "^Wood$");
        assert_eq!(first.options, "i");
    }

    #[test]
    fn test_build_filter_empty_tag_list_is_no_filter() {
        let filter = ProductFilter {
            tags: Some(vec![]),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.is_empty());
    }

    mod live {
        use super::*;
        use crate::models::CreateProduct;

        async fn repo() -> MongoProductRepository {
            let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
                .await
                .unwrap();
            let db = client.database("catalog_test");
            MongoProductRepository::with_collection(&db, "products_test")
        }

        #[tokio::test]
        #[ignore = "requires a running MongoDB instance"]
        async fn test_crud_round_trip() {
            let repo = repo().await;
            repo.init().await.unwrap();

            let created = repo
                .add(Product::from_create(CreateProduct {
                    name: "Integration Lamp".to_string(),
                    description: Some("desk lamp".to_string()),
                    price: 35.0,
                    category: "Lighting".to_string(),
                    tags: vec!["desk".to_string()],
                    in_stock: true,
                }))
                .await
                .unwrap();

            let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
            assert_eq!(fetched, created);

            assert!(repo.delete(created.id).await.unwrap());
            assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        }

        #[tokio::test]
        #[ignore = "requires a running MongoDB instance"]
        async fn test_init_is_idempotent() {
            let repo = repo().await;
            repo.init().await.unwrap();
            let before = repo.list_all().await.unwrap().len();
            repo.init().await.unwrap();
            assert_eq!(repo.list_all().await.unwrap().len(), before);
        }
    }
}
