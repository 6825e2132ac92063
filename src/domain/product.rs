use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Products with at most this many units left are reported as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Inventory classification derived from a product's stock level.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// Classify a stock level: 0 is out of stock, 1..=5 is low stock, more is in stock.
    pub fn classify(stock: i32) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Label used by the analytic views and the JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "In Stock" => Ok(Self::InStock),
            "Low Stock" => Ok(Self::LowStock),
            "Out of Stock" => Ok(Self::OutOfStock),
            other => Err(format!("unknown stock status `{other}`")),
        }
    }
}

/// Minimal category information embedded in product payloads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: i32,
    pub name: String,
}

/// Domain representation of a product sold by the shop.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    /// Units currently available for sale.
    pub stock: i32,
    /// Classification of `stock`.
    pub stock_status: StockStatus,
    /// Longer description shown to customers; empty when not provided.
    pub description: String,
    /// Categories the product is listed under.
    pub categories: Vec<CategorySummary>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    /// Initial stock level.
    pub stock: i32,
    /// Longer description shown to customers.
    pub description: String,
    /// Identifiers of the categories the product belongs to.
    pub category_ids: Vec<i32>,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(name: impl Into<String>, price: i64, stock: i32) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            description: String::new(),
            category_ids: Vec::new(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the categories the product should be listed under.
    pub fn with_category_ids(mut self, category_ids: impl Into<Vec<i32>>) -> Self {
        self.category_ids = category_ids.into();
        self
    }
}

/// Replacement data applied when updating an existing product.
///
/// Updates are full replacements: the category set is replaced as a whole.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub description: String,
    pub category_ids: Vec<i32>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateProduct {
    /// Build an update payload with the current timestamp.
    pub fn new(
        name: impl Into<String>,
        price: i64,
        stock: i32,
        description: impl Into<String>,
        category_ids: impl Into<Vec<i32>>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            description: description.into(),
            category_ids: category_ids.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional case-insensitive search applied to the name and description.
    pub search: Option<String>,
    /// Optional category filter.
    pub category_id: Option<i32>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Only return products listed under `category_id`.
    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
