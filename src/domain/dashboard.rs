use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderStatus;
use crate::domain::product::StockStatus;

/// Qualitative label derived from the number of units a product has sold.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesPerformance {
    #[serde(rename = "Best Seller")]
    BestSeller,
    #[serde(rename = "Good Seller")]
    GoodSeller,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "No Sales")]
    NoSales,
}

impl SalesPerformance {
    /// 20+ units is a best seller, 10+ a good seller, any sale is average.
    pub fn classify(total_sold: i64) -> Self {
        match total_sold {
            sold if sold >= 20 => Self::BestSeller,
            sold if sold >= 10 => Self::GoodSeller,
            sold if sold >= 1 => Self::Average,
            _ => Self::NoSales,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestSeller => "Best Seller",
            Self::GoodSeller => "Good Seller",
            Self::Average => "Average",
            Self::NoSales => "No Sales",
        }
    }
}

impl FromStr for SalesPerformance {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Best Seller" => Ok(Self::BestSeller),
            "Good Seller" => Ok(Self::GoodSeller),
            "Average" => Ok(Self::Average),
            "No Sales" => Ok(Self::NoSales),
            other => Err(format!("unknown sales performance `{other}`")),
        }
    }
}

/// Sales totals of a single product over completed orders.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesSummary {
    pub product_id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    /// Units sold through completed orders.
    pub total_sold: i64,
    /// Revenue of those units at their captured prices.
    pub total_revenue: i64,
    pub stock_status: StockStatus,
    pub sales_performance: SalesPerformance,
}

impl ProductSalesSummary {
    /// Build a summary, deriving both labels from the totals.
    pub fn new(
        product_id: i32,
        name: impl Into<String>,
        price: i64,
        stock: i32,
        total_sold: i64,
        total_revenue: i64,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            stock,
            total_sold,
            total_revenue,
            stock_status: StockStatus::classify(stock),
            sales_performance: SalesPerformance::classify(total_sold),
        }
    }
}

/// Order counts and completed revenue of a single calendar day.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub completed_orders: i64,
    pub pending_orders: i64,
    pub cancelled_orders: i64,
    /// Sum of completed order totals.
    pub revenue: i64,
}

impl DailyRevenue {
    /// A day without orders.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_orders: 0,
            completed_orders: 0,
            pending_orders: 0,
            cancelled_orders: 0,
            revenue: 0,
        }
    }
}

/// Sales totals of the products listed under a category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
    pub category_id: i32,
    pub name: String,
    pub product_count: i64,
    pub total_sold: i64,
    pub total_revenue: i64,
}

/// Stock information of a product, read from the raw tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub product_id: i32,
    pub name: String,
    pub price: i64,
    pub stock: i32,
}

/// A single order item joined with the status of its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesLine {
    pub product_id: i32,
    pub quantity: i64,
    pub total_price: i64,
    pub status: OrderStatus,
}

/// Order fields needed to bucket revenue per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderHeader {
    pub id: i32,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub created_at: NaiveDateTime,
}

/// Plain table counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub total_products: i64,
    pub total_categories: i64,
    pub pending_orders: i64,
}

/// Window over which `totalRevenue` is reported.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    /// Every completed order.
    #[default]
    All,
    /// Completed orders since the first day of the current month.
    Month,
}

impl ReportingPeriod {
    /// First day counted by the period, `None` for all-time.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::All => None,
            Self::Month => today.with_day0(0),
        }
    }
}

/// Which aggregation path produced a dashboard payload.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Precomputed analytic views.
    Views,
    /// Live aggregation over the raw tables.
    Fallback,
}

/// Machine-readable description of an infrastructure failure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
}

/// One day of the trailing revenue chart.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRevenueEntry {
    pub date: NaiveDate,
    pub revenue: i64,
    /// Completed orders placed that day.
    pub order_count: i64,
    /// `revenue / order_count`, 0 on days without orders.
    pub average_order_value: i64,
}

/// A completed order as listed in the "recent sales" table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecentSale {
    pub id: i32,
    pub customer: String,
    /// First product name, suffixed with `(+K more)` for additional lines.
    pub product: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub status: OrderStatus,
}

/// Snapshot of shop performance returned by the dashboard endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_products: i64,
    pub total_categories: i64,
    pub total_revenue: i64,
    pub today_revenue: i64,
    pub week_revenue: i64,
    pub pending_orders: i64,
    pub products_in_stock: i64,
    pub products_low_stock: i64,
    pub products_out_of_stock: i64,
    pub top_products: Vec<ProductSalesSummary>,
    pub low_stock_products: Vec<ProductSalesSummary>,
    pub weekly_revenue_details: Vec<WeeklyRevenueEntry>,
    pub recent_sales: Vec<RecentSale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_performance: Option<Vec<CategoryPerformance>>,
    pub period: ReportingPeriod,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}
