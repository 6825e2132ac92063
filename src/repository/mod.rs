use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::db::{DbConnection, DbPool};

use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::dashboard::{
    CatalogCounts, CategoryPerformance, DailyRevenue, OrderHeader, ProductSalesSummary, SalesLine,
    StockLevel,
};
use crate::domain::order::{NewOrder, Order, OrderListQuery, OrderStatus};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};

pub use errors::{RepositoryError, RepositoryResult};

pub mod category;
pub mod dashboard;
pub mod errors;
pub mod order;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records and their category links.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    /// Case-insensitive lookup by name.
    fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Return the subset of `ids` that exist.
    fn existing_category_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>>;
}

/// Write operations over category records.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        category_id: i32,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    /// Delete the category together with its product links.
    fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over orders.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Create the order and its items and decrement stock, all or nothing.
    fn place_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    /// Move a pending order to `status`, restoring stock when it is cancelled.
    fn update_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
}

/// Counters shown on the dashboard regardless of the aggregation path.
pub trait DashboardReader {
    fn catalog_counts(&self) -> RepositoryResult<CatalogCounts>;
}

/// Queries over the analytic views.
pub trait AnalyticsViewReader {
    /// Fail when any analytic view is missing or unreadable.
    fn check_analytics_views(&self) -> RepositoryResult<()>;
    fn list_product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>>;
    /// Daily rows on or after `since`, ascending by date.
    fn list_daily_revenue(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyRevenue>>;
    fn list_category_performance(&self) -> RepositoryResult<Vec<CategoryPerformance>>;
}

/// Raw rows used to aggregate the dashboard without the views.
pub trait AnalyticsRawReader {
    fn list_stock_levels(&self) -> RepositoryResult<Vec<StockLevel>>;
    fn list_sales_lines(&self) -> RepositoryResult<Vec<SalesLine>>;
    /// Order headers created on or after `since`.
    fn list_order_headers(
        &self,
        since: Option<NaiveDateTime>,
    ) -> RepositoryResult<Vec<OrderHeader>>;
}
