//! Public storefront reads; no role is required.

use crate::domain::product::Product;
use crate::repository::ProductReader;
use crate::services::ServiceResult;
use crate::services::products::{ProductsQuery, find_product};

/// Lists products shown to shoppers.
pub fn list_catalog<R>(repo: &R, query: ProductsQuery) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo.list_products(query.into_list_query())?)
}

/// Loads a single product shown to shoppers.
pub fn get_catalog_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    find_product(repo, product_id)
}
