use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, generated on create
    #[schema(example = "0199a3c4-5b6e-7f80-9a1b-2c3d4e5f6a7b")]
    pub id: String,
    #[schema(example = "Espresso machine")]
    pub name: String,
    /// Unit price, always greater than zero
    #[schema(example = 249.99)]
    pub price: f64,
    /// Units on hand, never negative
    #[schema(example = 12)]
    pub stock: i32,
}

impl Product {
    /// Build a new product with a freshly generated time-ordered id
    pub fn new(input: CreateProduct) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: input.name,
            price: input.price,
            stock: input.stock,
        }
    }

    /// Overwrite the mutable fields; the id never changes
    pub fn apply_changes(&mut self, changes: ProductChanges) {
        self.name = changes.name;
        self.price = changes.price;
        self.stock = changes.stock;
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "Espresso machine")]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    #[schema(example = 249.99)]
    pub price: f64,

    #[validate(range(min = 0, message = "stock must not be negative"))]
    #[serde(default)]
    #[schema(example = 12)]
    pub stock: i32,
}

/// DTO for replacing a product's fields
///
/// `idProduct` may repeat the path id; when present and non-empty it must match.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateProduct {
    #[serde(rename = "idProduct", default, skip_serializing_if = "Option::is_none")]
    pub id_product: Option<String>,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,

    #[validate(range(min = 0, message = "stock must not be negative"))]
    #[serde(default)]
    pub stock: i32,
}

impl UpdateProduct {
    /// Body id, ignoring an empty string
    pub fn body_id(&self) -> Option<&str> {
        self.id_product.as_deref().filter(|id| !id.is_empty())
    }
}

/// Field values written by a repository update
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub name: String,
    pub price: f64,
    pub stock: i32,
}

impl From<UpdateProduct> for ProductChanges {
    fn from(input: UpdateProduct) -> Self {
        Self {
            name: input.name,
            price: input.price,
            stock: input.stock,
        }
    }
}

/// Raw list query parameters, kept as strings so bad values fall back to defaults
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size; missing, unparsable or non-positive means 10
    pub limit: Option<String>,
    /// Rows to skip; missing, unparsable or negative means 0
    pub offset: Option<String>,
}

/// A limit/offset window over the id-ordered product list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 10;

    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Lenient parsing of `limit`/`offset` query values.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|&v| v > 0)
            .map_or(Self::DEFAULT_LIMIT, |v| v as u64);

        let offset = offset
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|&v| v >= 0)
            .map_or(0, |v| v as u64);

        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

impl ListQuery {
    /// Build from raw query pairs, keeping the first value of a repeated key
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        Self {
            limit: first("limit"),
            offset: first("offset"),
        }
    }
}

impl From<&ListQuery> for Page {
    fn from(query: &ListQuery) -> Self {
        Self::from_query(query.limit.as_deref(), query.offset.as_deref())
    }
}
