use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::dashboard::{
    CategoryPerformance as DomainCategoryPerformance, DailyRevenue as DomainDailyRevenue,
    OrderHeader, ProductSalesSummary, SalesLine, SalesPerformance, StockLevel,
};
use crate::domain::product::StockStatus;

/// Row of `product_summary_view`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_summary_view)]
pub struct ProductSummaryRow {
    pub product_id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub total_sold: i64,
    pub total_revenue: i64,
    pub stock_status: String,
    pub sales_performance: String,
}

/// Row of `daily_revenue_view`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::daily_revenue_view)]
pub struct DailyRevenueRow {
    pub day: NaiveDate,
    pub total_orders: i64,
    pub completed_orders: i64,
    pub pending_orders: i64,
    pub cancelled_orders: i64,
    pub total_revenue: i64,
}

/// Row of `category_performance_view`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::category_performance_view)]
pub struct CategoryPerformanceRow {
    pub category_id: i32,
    pub name: String,
    pub product_count: i64,
    pub total_sold: i64,
    pub total_revenue: i64,
}

impl From<ProductSummaryRow> for ProductSalesSummary {
    fn from(value: ProductSummaryRow) -> Self {
        let mut summary = ProductSalesSummary::new(
            value.product_id,
            value.name,
            value.price,
            value.stock,
            value.total_sold,
            value.total_revenue,
        );
        if let Ok(status) = value.stock_status.parse::<StockStatus>() {
            summary.stock_status = status;
        }
        if let Ok(performance) = value.sales_performance.parse::<SalesPerformance>() {
            summary.sales_performance = performance;
        }
        summary
    }
}

impl From<DailyRevenueRow> for DomainDailyRevenue {
    fn from(value: DailyRevenueRow) -> Self {
        Self {
            date: value.day,
            total_orders: value.total_orders,
            completed_orders: value.completed_orders,
            pending_orders: value.pending_orders,
            cancelled_orders: value.cancelled_orders,
            revenue: value.total_revenue,
        }
    }
}

impl From<CategoryPerformanceRow> for DomainCategoryPerformance {
    fn from(value: CategoryPerformanceRow) -> Self {
        Self {
            category_id: value.category_id,
            name: value.name,
            product_count: value.product_count,
            total_sold: value.total_sold,
            total_revenue: value.total_revenue,
        }
    }
}

/// Stock columns of a product row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct StockRow {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
}

impl From<StockRow> for StockLevel {
    fn from(value: StockRow) -> Self {
        Self {
            product_id: value.id,
            name: value.name,
            price: value.price,
            stock: value.stock,
        }
    }
}

/// Order item joined with its order status.
pub type SalesLineRow = (i32, i32, i64, String);

pub fn sales_line_from_row((product_id, quantity, total_price, status): SalesLineRow) -> SalesLine {
    SalesLine {
        product_id,
        quantity: i64::from(quantity),
        total_price,
        status: status.parse().unwrap_or_default(),
    }
}

/// Order columns needed to bucket revenue by day.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct OrderHeaderRow {
    pub id: i32,
    pub status: String,
    pub total_amount: i64,
    pub created_at: NaiveDateTime,
}

impl From<OrderHeaderRow> for OrderHeader {
    fn from(value: OrderHeaderRow) -> Self {
        Self {
            id: value.id,
            status: value.status.parse().unwrap_or_default(),
            total_amount: value.total_amount,
            created_at: value.created_at,
        }
    }
}
