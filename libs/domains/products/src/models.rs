use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product entity - the stored record shape.
///
/// Serialized as camelCase; the id maps to `_id` so the same shape works as
/// a MongoDB document. API responses go through [`ProductDto`] instead, which
/// exposes the id under its public name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Product description
    #[serde(default)]
    pub description: Option<String>,
    /// Price, non-negative
    pub price: f64,
    /// Product category; also the document partition key
    pub category: String,
    /// Tags, ordered, duplicates preserved
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the product is currently in stock
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Creation timestamp, set once by the repository
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, null until the first update
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_in_stock() -> bool {
    true
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

/// DTO for partially updating an existing product
///
/// Every field is optional; only fields present in the request overwrite the
/// stored values. Absence and an explicit default are different signals.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub in_stock: Option<bool>,
}

/// Public search contract: free-text query and/or category
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Case-insensitive substring match against name or description
    pub query: Option<String>,
    /// Exact category match, case-insensitive
    pub category: Option<String>,
}

/// Response shape returned by the service layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Repository-level filters for search
///
/// Only `query` and `category` are populated by the public contract today;
/// the price range, stock, and tag filters exist for future use and stay
/// `None` in current call paths.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match against name or description
    pub query: Option<String>,
    /// Exact category match, case-insensitive
    pub category: Option<String>,
    /// Minimum price (inclusive)
    pub min_price: Option<f64>,
    /// Maximum price (inclusive)
    pub max_price: Option<f64>,
    /// Only products with this stock flag
    pub in_stock: Option<bool>,
    /// Products carrying at least one of these tags (case-insensitive)
    pub tags: Option<Vec<String>>,
}

impl Product {
    /// Build an entity from a create request.
    ///
    /// The id stays nil and the timestamps are placeholders until the
    /// repository `add` assigns them.
    pub fn from_create(input: CreateProduct) -> Self {
        Self {
            id: Uuid::nil(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            tags: input.tags,
            in_stock: input.in_stock,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Apply a partial update: only fields present in the request overwrite.
    ///
    /// Does not touch `updated_at`; the repository stamps it on a successful
    /// write.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(in_stock) = update.in_stock {
            self.in_stock = in_stock;
        }
    }

    /// Map the entity into the response DTO.
    pub fn into_dto(self) -> ProductDto {
        ProductDto {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            tags: self.tags,
            in_stock: self.in_stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ProductFilter {
    /// True when every supplied filter matches the product (filters AND).
    ///
    /// This is the reference semantics both backends must agree on; the
    /// MongoDB backend expresses the same predicates as a query document.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(query) = normalized(self.query.as_deref()) {
            let query = query.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&query);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query));
            if !in_name && !in_description {
                return false;
            }
        }

        if let Some(category) = normalized(self.category.as_deref()) {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }

        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }

        if let Some(ref tags) = self.tags {
            let any_tag_present = tags.is_empty()
                || tags
                    .iter()
                    .any(|t| product.tags.iter().any(|pt| pt.eq_ignore_ascii_case(t)));
            if !any_tag_present {
                return false;
            }
        }

        true
    }
}

/// Treat blank and whitespace-only strings as absent.
pub(crate) fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The three sample records seeded into a fresh backend.
pub fn sample_products() -> Vec<Product> {
    let now = Utc::now();
    vec![
        Product {
            id: Uuid::new_v4(),
            name: "Laptop".to_string(),
            description: Some("High-performance laptop with the latest processor".to_string()),
            price: 1200.0,
            category: "Electronics".to_string(),
            tags: vec![
                "computer".to_string(),
                "tech".to_string(),
                "portable".to_string(),
            ],
            in_stock: true,
            created_at: now,
            updated_at: None,
        },
        Product {
            id: Uuid::new_v4(),
            name: "Smartphone".to_string(),
            description: Some("Latest smartphone with high-resolution camera".to_string()),
            price: 800.0,
            category: "Electronics".to_string(),
            tags: vec![
                "mobile".to_string(),
                "tech".to_string(),
                "phone".to_string(),
            ],
            in_stock: true,
            created_at: now,
            updated_at: None,
        },
        Product {
            id: Uuid::new_v4(),
            name: "Coffee Table".to_string(),
            description: Some("Elegant coffee table made of solid wood".to_string()),
            price: 250.0,
            category: "Furniture".to_string(),
            tags: vec![
                "table".to_string(),
                "wood".to_string(),
                "living room".to_string(),
            ],
            in_stock: true,
            created_at: now,
            updated_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, description: Option<&str>, category: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(String::from),
            price: 10.0,
            category: category.to_string(),
            tags: vec![],
            in_stock: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_apply_update_only_supplied_fields() {
        let mut p = product("Laptop", Some("fast"), "Electronics");
        let original_created = p.created_at;

        p.apply_update(UpdateProduct {
            price: Some(99.5),
            ..Default::default()
        });

        assert_eq!(p.price, 99.5);
        assert_eq!(p.name, "Laptop");
        assert_eq!(p.description.as_deref(), Some("fast"));
        assert_eq!(p.category, "Electronics");
        assert_eq!(p.created_at, original_created);
    }

    #[test]
    fn test_filter_query_matches_name_or_description() {
        let filter = ProductFilter {
            query: Some("LAP".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&product("Laptop", None, "Electronics")));
        assert!(filter.matches(&product("Desk", Some("fits a laptop"), "Furniture")));
        assert!(!filter.matches(&product("Smartphone", Some("camera"), "Electronics")));
    }

    #[test]
    fn test_filter_category_case_insensitive_exact() {
        let filter = ProductFilter {
            category: Some("electronics".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&product("Laptop", None, "Electronics")));
        assert!(!filter.matches(&product("Chair", None, "Furniture")));
    }

    #[test]
    fn test_filter_query_and_category_are_anded() {
        let filter = ProductFilter {
            query: Some("lap".to_string()),
            category: Some("Furniture".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&product("Laptop", None, "Electronics")));
        assert!(filter.matches(&product("Lap Desk", None, "Furniture")));
    }

    #[test]
    fn test_filter_blank_query_treated_as_absent() {
        let filter = ProductFilter {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&product("Anything", None, "Misc")));
    }

    #[test]
    fn test_filter_tags_match_any_case_insensitive() {
        let mut p = product("Coffee Table", None, "Furniture");
        p.tags = vec!["Wood".to_string(), "living room".to_string()];

        let filter = ProductFilter {
            tags: Some(vec!["wood".to_string(), "metal".to_string()]),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let no_overlap = ProductFilter {
            tags: Some(vec!["metal".to_string()]),
            ..Default::default()
        };
        assert!(!no_overlap.matches(&p));

        let empty = ProductFilter {
            tags: Some(vec![]),
            ..Default::default()
        };
        assert!(empty.matches(&p));
    }

    #[test]
    fn test_product_wire_shape_is_camel_case() {
        let p = product("Laptop", None, "Electronics");
        let json = serde_json::to_value(p.clone().into_dto()).unwrap();
        assert!(json.get("inStock").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json.get("id").unwrap().as_str().unwrap(), p.id.to_string());
    }

    #[test]
    fn test_product_document_uses_underscore_id() {
        let p = product("Laptop", None, "Electronics");
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_sample_products_seed() {
        let seed = sample_products();
        assert_eq!(seed.len(), 3);
        assert!(seed.iter().any(|p| p.name == "Laptop"));
        assert!(seed.iter().all(|p| p.updated_at.is_none()));
    }
}
