use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;

use super::{
    AnalyticsRawReader, AnalyticsViewReader, CategoryReader, CategoryWriter, DashboardReader,
    OrderReader, OrderWriter, ProductReader, ProductWriter, RepositoryResult,
};
use crate::domain::{
    category::{Category, NewCategory, UpdateCategory},
    dashboard::{
        CatalogCounts, CategoryPerformance, DailyRevenue, OrderHeader, ProductSalesSummary,
        SalesLine, StockLevel,
    },
    order::{NewOrder, Order, OrderListQuery, OrderStatus},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
        fn get_category_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
        fn existing_category_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(&self, category_id: i32, updates: &UpdateCategory) -> RepositoryResult<Category>;
        fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn place_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn update_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
    }
}

mock! {
    pub DashboardReader {}

    impl DashboardReader for DashboardReader {
        fn catalog_counts(&self) -> RepositoryResult<CatalogCounts>;
    }
}

mock! {
    pub AnalyticsViewReader {}

    impl AnalyticsViewReader for AnalyticsViewReader {
        fn check_analytics_views(&self) -> RepositoryResult<()>;
        fn list_product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>>;
        fn list_daily_revenue(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyRevenue>>;
        fn list_category_performance(&self) -> RepositoryResult<Vec<CategoryPerformance>>;
    }
}

mock! {
    pub AnalyticsRawReader {}

    impl AnalyticsRawReader for AnalyticsRawReader {
        fn list_stock_levels(&self) -> RepositoryResult<Vec<StockLevel>>;
        fn list_sales_lines(&self) -> RepositoryResult<Vec<SalesLine>>;
        fn list_order_headers(&self, since: Option<NaiveDateTime>) -> RepositoryResult<Vec<OrderHeader>>;
    }
}
