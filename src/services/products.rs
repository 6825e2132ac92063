use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::ProductForm;
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string matched against name and description.
    pub search: Option<String>,
    /// Optional category filter.
    pub category: Option<i32>,
}

impl ProductsQuery {
    pub(crate) fn into_list_query(self) -> ProductListQuery {
        let mut query = ProductListQuery::new();
        if let Some(term) = self.search.filter(|term| !term.trim().is_empty()) {
            query = query.search(term);
        }
        if let Some(category_id) = self.category {
            query = query.category(category_id);
        }
        query
    }
}

/// Lists products for the admin catalog.
pub fn list_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.list_products(query.into_list_query())
        .map_err(ServiceError::from)
}

/// Loads a single product.
pub fn get_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    find_product(repo, product_id)
}

/// Creates a product and links it to the requested categories.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    ensure_categories_exist(repo, &payload.category_ids)?;

    repo.create_product(&payload).map_err(ServiceError::from)
}

/// Replaces every field of a product, including its category set.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    find_product(repo, product_id)?;
    ensure_categories_exist(repo, &updates.category_ids)?;

    repo.update_product(product_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a product that no order references.
pub fn delete_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_product(product_id).map_err(ServiceError::from)
}

pub(crate) fn find_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::NotFound(format!("product {product_id} not found")))
}

fn ensure_categories_exist<R>(repo: &R, category_ids: &[i32]) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    if category_ids.is_empty() {
        return Ok(());
    }

    let existing = repo
        .existing_category_ids(category_ids)
        .map_err(ServiceError::from)?;

    let missing: Vec<String> = category_ids
        .iter()
        .filter(|id| !existing.contains(id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::InvalidRequest(format!(
            "unknown category ids: {}",
            missing.join(", ")
        )))
    }
}
