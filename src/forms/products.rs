use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a product description.
const DESCRIPTION_MAX_LEN: usize = 2048;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Largest accepted unit price in the smallest currency unit.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// Largest accepted stock level.
pub const MAX_STOCK: i32 = 1_000_000;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// A category identifier is not a positive integer.
    #[error("invalid category id `{0}`")]
    InvalidCategoryId(i32),
}

/// JSON body accepted when creating or replacing a product.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Unit price in the smallest currency unit.
    #[validate(range(min = 0, max = MAX_PRICE))]
    pub price: i64,
    #[validate(range(min = 0, max = MAX_STOCK))]
    #[serde(default)]
    pub stock: i32,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    /// Categories the product should be listed under.
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

/// Sanitized fields shared by the create and update conversions.
struct CleanProduct {
    name: String,
    price: i64,
    stock: i32,
    description: String,
    category_ids: Vec<i32>,
}

impl ProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        let clean = self.clean()?;

        Ok(NewProduct::new(clean.name, clean.price, clean.stock)
            .with_description(clean.description)
            .with_category_ids(clean.category_ids))
    }

    /// Validates and sanitizes the payload into a full-replacement `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        let clean = self.clean()?;

        Ok(UpdateProduct::new(
            clean.name,
            clean.price,
            clean.stock,
            clean.description,
            clean.category_ids,
        ))
    }

    fn clean(self) -> ProductFormResult<CleanProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .unwrap_or_default();

        let mut category_ids: Vec<i32> = Vec::with_capacity(self.category_ids.len());
        for id in self.category_ids {
            if id <= 0 {
                return Err(ProductFormError::InvalidCategoryId(id));
            }
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }

        Ok(CleanProduct {
            name,
            price: self.price,
            stock: self.stock,
            description,
            category_ids,
        })
    }
}
