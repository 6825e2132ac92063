//! Dashboard aggregation.
//!
//! Figures are read from the analytic views when they are healthy. When the
//! health check or any view read fails, the same figures are recomputed from
//! the raw order, order item and product rows and the payload is marked as a
//! fallback.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate, NaiveTime};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::dashboard::{
    CategoryPerformance, DailyRevenue, DashboardSnapshot, DataSource, Diagnostic, OrderHeader,
    ProductSalesSummary, RecentSale, ReportingPeriod, SalesLine, StockLevel, WeeklyRevenueEntry,
};
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::domain::product::StockStatus;
use crate::repository::{
    AnalyticsRawReader, AnalyticsViewReader, DashboardReader, OrderReader, RepositoryResult,
};
use crate::services::{ServiceError, ServiceResult};

/// Number of products listed in `topProducts`.
pub const TOP_PRODUCTS_LIMIT: usize = 5;
/// Number of orders listed in `recentSales`.
pub const RECENT_SALES_LIMIT: usize = 5;
/// Length of the trailing revenue window, today included.
pub const REVENUE_WINDOW_DAYS: u64 = 7;

/// Query parameters accepted by the dashboard endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub period: ReportingPeriod,
}

/// Dates bounding the figures of one dashboard snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub today: NaiveDate,
    /// First day of the trailing revenue window.
    pub week_start: NaiveDate,
    /// First day counted by `totalRevenue`, `None` for all-time.
    pub period_start: Option<NaiveDate>,
}

impl ReportWindow {
    pub fn new(today: NaiveDate, period: ReportingPeriod) -> Self {
        let week_start = today
            .checked_sub_days(Days::new(REVENUE_WINDOW_DAYS - 1))
            .unwrap_or(today);
        Self {
            today,
            week_start,
            period_start: period.start(today),
        }
    }

    /// Earliest day any figure needs, `None` when every day is needed.
    pub fn earliest(&self) -> Option<NaiveDate> {
        self.period_start
            .map(|period_start| period_start.min(self.week_start))
    }
}

/// A way of obtaining the aggregated sales figures.
pub trait AnalyticsSource {
    /// Which path the figures come from.
    fn kind(&self) -> DataSource;

    /// Probe the source before it is used.
    fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }

    /// Sales summary of every product, ascending by product id.
    fn product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>>;

    /// Per-day figures on or after `since`, ascending by date.
    fn daily_revenue(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyRevenue>>;

    /// Per-category figures when the source can provide them.
    fn category_performance(&self) -> RepositoryResult<Option<Vec<CategoryPerformance>>> {
        Ok(None)
    }
}

/// Reads the precomputed analytic views.
pub struct ViewSource<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: AnalyticsViewReader + ?Sized> ViewSource<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }
}

impl<R: AnalyticsViewReader + ?Sized> AnalyticsSource for ViewSource<'_, R> {
    fn kind(&self) -> DataSource {
        DataSource::Views
    }

    fn health_check(&self) -> RepositoryResult<()> {
        self.repo.check_analytics_views()
    }

    fn product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>> {
        self.repo.list_product_summaries()
    }

    fn daily_revenue(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyRevenue>> {
        self.repo.list_daily_revenue(since)
    }

    fn category_performance(&self) -> RepositoryResult<Option<Vec<CategoryPerformance>>> {
        self.repo.list_category_performance().map(Some)
    }
}

/// Aggregates the raw tables in application code.
pub struct LiveSource<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: AnalyticsRawReader + ?Sized> LiveSource<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }
}

impl<R: AnalyticsRawReader + ?Sized> AnalyticsSource for LiveSource<'_, R> {
    fn kind(&self) -> DataSource {
        DataSource::Fallback
    }

    fn product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>> {
        let stock = self.repo.list_stock_levels()?;
        let lines = self.repo.list_sales_lines()?;
        Ok(summarize_products(stock, &lines))
    }

    fn daily_revenue(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyRevenue>> {
        let since = since.map(|day| day.and_time(NaiveTime::MIN));
        let headers = self.repo.list_order_headers(since)?;
        Ok(aggregate_daily(&headers))
    }
}

/// Figures produced by one analytics source.
#[derive(Debug, Clone)]
pub struct SalesAnalytics {
    pub products: Vec<ProductSalesSummary>,
    pub daily: Vec<DailyRevenue>,
    pub category_performance: Option<Vec<CategoryPerformance>>,
}

/// Run the health check and every read of `source`.
pub fn collect_analytics<S>(source: &S, window: &ReportWindow) -> RepositoryResult<SalesAnalytics>
where
    S: AnalyticsSource + ?Sized,
{
    source.health_check()?;
    Ok(SalesAnalytics {
        products: source.product_summaries()?,
        daily: source.daily_revenue(window.earliest())?,
        category_performance: source.category_performance()?,
    })
}

/// Builds the dashboard snapshot as of `today`.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DashboardQuery,
    today: NaiveDate,
) -> ServiceResult<DashboardSnapshot>
where
    R: DashboardReader + OrderReader + AnalyticsViewReader + AnalyticsRawReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let window = ReportWindow::new(today, query.period);

    let views = ViewSource::new(repo);
    let (analytics, source, diagnostic) = match collect_analytics(&views, &window) {
        Ok(analytics) => (analytics, views.kind(), None),
        Err(view_err) => {
            log::warn!("Analytic views unusable, aggregating raw tables: {view_err}");
            let live = LiveSource::new(repo);
            match collect_analytics(&live, &window) {
                Ok(analytics) => {
                    let diagnostic = Diagnostic {
                        code: view_err
                            .diagnostic_code()
                            .unwrap_or("analytics_unavailable")
                            .to_string(),
                        message: view_err.to_string(),
                    };
                    (analytics, live.kind(), Some(diagnostic))
                }
                Err(live_err) => {
                    log::error!("Dashboard aggregation failed on both paths: {live_err}");
                    return Err(ServiceError::Repository(live_err));
                }
            }
        }
    };

    let counts = repo.catalog_counts().map_err(ServiceError::from)?;
    let (_, recent_orders) = repo
        .list_orders(
            OrderListQuery::new()
                .status(OrderStatus::Completed)
                .paginate(1, RECENT_SALES_LIMIT),
        )
        .map_err(ServiceError::from)?;

    let weekly = weekly_series(window.today, &analytics.daily);
    let (in_stock, low_stock, out_of_stock) = stock_partition(&analytics.products);

    Ok(DashboardSnapshot {
        total_products: counts.total_products,
        total_categories: counts.total_categories,
        total_revenue: period_revenue(&analytics.daily, window.period_start),
        today_revenue: weekly.last().map(|entry| entry.revenue).unwrap_or_default(),
        week_revenue: weekly.iter().map(|entry| entry.revenue).sum(),
        pending_orders: counts.pending_orders,
        products_in_stock: in_stock,
        products_low_stock: low_stock,
        products_out_of_stock: out_of_stock,
        top_products: top_products(&analytics.products, TOP_PRODUCTS_LIMIT),
        low_stock_products: low_stock_products(&analytics.products),
        weekly_revenue_details: weekly,
        recent_sales: recent_orders.iter().map(recent_sale).collect(),
        category_performance: analytics.category_performance,
        period: query.period,
        source,
        diagnostic,
    })
}

/// Per-product totals over completed order lines.
pub fn summarize_products(
    stock: Vec<StockLevel>,
    lines: &[SalesLine],
) -> Vec<ProductSalesSummary> {
    let mut totals: HashMap<i32, (i64, i64)> = HashMap::new();
    for line in lines
        .iter()
        .filter(|line| line.status == OrderStatus::Completed)
    {
        let entry = totals.entry(line.product_id).or_default();
        entry.0 += line.quantity;
        entry.1 += line.total_price;
    }

    let mut summaries: Vec<ProductSalesSummary> = stock
        .into_iter()
        .map(|level| {
            let (sold, revenue) = totals.get(&level.product_id).copied().unwrap_or_default();
            ProductSalesSummary::new(
                level.product_id,
                level.name,
                level.price,
                level.stock,
                sold,
                revenue,
            )
        })
        .collect();
    summaries.sort_by_key(|summary| summary.product_id);
    summaries
}

/// Bucket orders by their UTC creation date.
pub fn aggregate_daily(headers: &[OrderHeader]) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, DailyRevenue> = BTreeMap::new();
    for header in headers {
        let date = header.created_at.date();
        let day = days
            .entry(date)
            .or_insert_with(|| DailyRevenue::empty(date));
        day.total_orders += 1;
        match header.status {
            OrderStatus::Completed => {
                day.completed_orders += 1;
                day.revenue += header.total_amount;
            }
            OrderStatus::Pending => day.pending_orders += 1,
            OrderStatus::Cancelled => day.cancelled_orders += 1,
        }
    }
    days.into_values().collect()
}

/// Exactly one entry per day of the trailing window ending `today`, zero-filled.
pub fn weekly_series(today: NaiveDate, daily: &[DailyRevenue]) -> Vec<WeeklyRevenueEntry> {
    let by_date: HashMap<NaiveDate, &DailyRevenue> =
        daily.iter().map(|day| (day.date, day)).collect();

    (0..REVENUE_WINDOW_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let (revenue, order_count) = by_date
                .get(&date)
                .map(|day| (day.revenue, day.completed_orders))
                .unwrap_or_default();
            WeeklyRevenueEntry {
                date,
                revenue,
                order_count,
                average_order_value: if order_count > 0 {
                    revenue / order_count
                } else {
                    0
                },
            }
        })
        .collect()
}

/// Completed revenue on or after `since`, all of it when `since` is `None`.
pub fn period_revenue(daily: &[DailyRevenue], since: Option<NaiveDate>) -> i64 {
    daily
        .iter()
        .filter(|day| since.is_none_or(|since| day.date >= since))
        .map(|day| day.revenue)
        .sum()
}

/// Count products per stock status: in stock, low stock, out of stock.
pub fn stock_partition(products: &[ProductSalesSummary]) -> (i64, i64, i64) {
    products
        .iter()
        .fold((0, 0, 0), |(in_stock, low, out), product| {
            match product.stock_status {
                StockStatus::InStock => (in_stock + 1, low, out),
                StockStatus::LowStock => (in_stock, low + 1, out),
                StockStatus::OutOfStock => (in_stock, low, out + 1),
            }
        })
}

/// Best sellers by units sold, then revenue, then id; products without sales are skipped.
pub fn top_products(products: &[ProductSalesSummary], limit: usize) -> Vec<ProductSalesSummary> {
    let mut sold: Vec<ProductSalesSummary> = products
        .iter()
        .filter(|product| product.total_sold > 0)
        .cloned()
        .collect();
    sold.sort_by(|a, b| {
        b.total_sold
            .cmp(&a.total_sold)
            .then(b.total_revenue.cmp(&a.total_revenue))
            .then(a.product_id.cmp(&b.product_id))
    });
    sold.truncate(limit);
    sold
}

/// Low and out of stock products, emptiest first.
pub fn low_stock_products(products: &[ProductSalesSummary]) -> Vec<ProductSalesSummary> {
    let mut low: Vec<ProductSalesSummary> = products
        .iter()
        .filter(|product| product.stock_status != StockStatus::InStock)
        .cloned()
        .collect();
    low.sort_by_key(|product| (product.stock, product.product_id));
    low
}

/// Summarize a completed order for the recent sales table.
pub fn recent_sale(order: &Order) -> RecentSale {
    let product = match order.items.split_first() {
        Some((first, [])) => first.product_name.clone(),
        Some((first, rest)) => format!("{} (+{} more)", first.product_name, rest.len()),
        None => "-".to_string(),
    };

    RecentSale {
        id: order.id,
        customer: order.customer_name.clone(),
        product,
        date: order.created_at.date(),
        amount: order.total_amount,
        status: order.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::domain::dashboard::{CatalogCounts, SalesPerformance};
    use crate::domain::order::OrderItem;
    use crate::repository::RepositoryError;
    use crate::repository::mock::{
        MockAnalyticsRawReader, MockAnalyticsViewReader, MockDashboardReader, MockOrderReader,
    };

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap_or_default()
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, 0, 0).unwrap_or_default()
    }

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "admin".to_string(),
            email: "admin@kembangku.id".to_string(),
            hub_id: 1,
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn header(id: i32, status: OrderStatus, amount: i64, created_at: NaiveDateTime) -> OrderHeader {
        OrderHeader {
            id,
            status,
            total_amount: amount,
            created_at,
        }
    }

    fn item(id: i32, name: &str) -> OrderItem {
        OrderItem {
            id,
            product_id: id,
            product_name: name.to_string(),
            quantity: 1,
            price: 100,
            total_price: 100,
        }
    }

    fn completed_order(id: i32, items: Vec<OrderItem>) -> Order {
        Order {
            id,
            order_number: format!("BELI-20250523-{id:04}"),
            customer_name: "Isyana Sarasvati".to_string(),
            customer_email: "isyana@gmail.com".to_string(),
            customer_phone: None,
            total_amount: 350_000,
            status: OrderStatus::Completed,
            items,
            created_at: at(23, 15),
            updated_at: at(23, 15),
        }
    }

    #[test]
    fn weekly_series_has_seven_ascending_zero_filled_days() {
        let daily = vec![
            DailyRevenue {
                revenue: 900,
                completed_orders: 2,
                total_orders: 3,
                pending_orders: 1,
                ..DailyRevenue::empty(date(20))
            },
            DailyRevenue {
                revenue: 450,
                completed_orders: 1,
                total_orders: 1,
                ..DailyRevenue::empty(date(24))
            },
            DailyRevenue {
                revenue: 10_000,
                completed_orders: 1,
                total_orders: 1,
                ..DailyRevenue::empty(date(2))
            },
        ];

        let series = weekly_series(date(24), &daily);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date(18));
        assert_eq!(series[6].date, date(24));
        assert!(series.windows(2).all(|pair| pair[0].date < pair[1].date));
        assert_eq!(series[2].revenue, 900);
        assert_eq!(series[2].order_count, 2);
        assert_eq!(series[2].average_order_value, 450);
        assert_eq!(series[3].revenue, 0);
        assert_eq!(series[3].average_order_value, 0);
        assert_eq!(series[6].revenue, 450);
    }

    #[test]
    fn weekly_series_without_orders_is_all_zero() {
        let series = weekly_series(date(24), &[]);
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|entry| entry.revenue == 0 && entry.order_count == 0));
    }

    #[test]
    fn aggregate_daily_counts_statuses_and_completed_revenue() {
        let headers = vec![
            header(1, OrderStatus::Completed, 450_000, at(23, 8)),
            header(2, OrderStatus::Pending, 2_500_000, at(23, 22)),
            header(3, OrderStatus::Cancelled, 300_000, at(22, 10)),
            header(4, OrderStatus::Completed, 275_000, at(23, 23)),
        ];

        let daily = aggregate_daily(&headers);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, date(22));
        assert_eq!(daily[0].cancelled_orders, 1);
        assert_eq!(daily[0].revenue, 0);
        assert_eq!(daily[1].total_orders, 3);
        assert_eq!(daily[1].completed_orders, 2);
        assert_eq!(daily[1].pending_orders, 1);
        assert_eq!(daily[1].revenue, 725_000);
    }

    #[test]
    fn summarize_products_counts_only_completed_lines() {
        let stock = vec![
            StockLevel {
                product_id: 2,
                name: "Wedding Flowers".to_string(),
                price: 2_500_000,
                stock: 0,
            },
            StockLevel {
                product_id: 1,
                name: "Rose Bouquet".to_string(),
                price: 450_000,
                stock: 10,
            },
        ];
        let lines = vec![
            SalesLine {
                product_id: 1,
                quantity: 12,
                total_price: 5_400_000,
                status: OrderStatus::Completed,
            },
            SalesLine {
                product_id: 1,
                quantity: 3,
                total_price: 1_350_000,
                status: OrderStatus::Pending,
            },
            SalesLine {
                product_id: 2,
                quantity: 1,
                total_price: 2_500_000,
                status: OrderStatus::Cancelled,
            },
        ];

        let summaries = summarize_products(stock, &lines);

        assert_eq!(summaries[0].product_id, 1);
        assert_eq!(summaries[0].total_sold, 12);
        assert_eq!(summaries[0].total_revenue, 5_400_000);
        assert_eq!(summaries[0].sales_performance, SalesPerformance::GoodSeller);
        assert_eq!(summaries[1].total_sold, 0);
        assert_eq!(summaries[1].stock_status, StockStatus::OutOfStock);
        assert_eq!(summaries[1].sales_performance, SalesPerformance::NoSales);
    }

    #[test]
    fn top_products_orders_by_units_then_revenue_then_id() {
        let products = vec![
            ProductSalesSummary::new(1, "A", 100, 10, 5, 500),
            ProductSalesSummary::new(2, "B", 100, 10, 5, 900),
            ProductSalesSummary::new(3, "C", 100, 10, 0, 0),
            ProductSalesSummary::new(4, "D", 100, 10, 25, 2500),
            ProductSalesSummary::new(5, "E", 100, 10, 5, 900),
        ];

        let top = top_products(&products, 3);
        let ids: Vec<i32> = top.iter().map(|product| product.product_id).collect();

        assert_eq!(ids, vec![4, 2, 5]);
        assert!(
            top_products(&products, 10)
                .iter()
                .all(|product| product.total_sold > 0)
        );
    }

    #[test]
    fn stock_partition_and_low_stock_list_agree() {
        let products = vec![
            ProductSalesSummary::new(1, "A", 100, 10, 0, 0),
            ProductSalesSummary::new(2, "B", 100, 5, 0, 0),
            ProductSalesSummary::new(3, "C", 100, 0, 0, 0),
            ProductSalesSummary::new(4, "D", 100, 1, 0, 0),
        ];

        assert_eq!(stock_partition(&products), (1, 2, 1));
        let low: Vec<i32> = low_stock_products(&products)
            .iter()
            .map(|product| product.product_id)
            .collect();
        assert_eq!(low, vec![3, 4, 2]);
    }

    #[test]
    fn recent_sale_mentions_additional_lines() {
        let single = recent_sale(&completed_order(1, vec![item(1, "Birthday Bundle")]));
        assert_eq!(single.product, "Birthday Bundle");
        assert_eq!(single.date, date(23));

        let multiple = recent_sale(&completed_order(
            2,
            vec![
                item(1, "Rose Bouquet"),
                item(2, "Lily Arrangement"),
                item(3, "Orchid Collection"),
            ],
        ));
        assert_eq!(multiple.product, "Rose Bouquet (+2 more)");
        assert_eq!(multiple.customer, "Isyana Sarasvati");
    }

    #[test]
    fn month_window_reaches_back_to_the_earlier_start() {
        let window = ReportWindow::new(date(3), ReportingPeriod::Month);
        assert_eq!(window.week_start, NaiveDate::from_ymd_opt(2025, 4, 27).unwrap());
        assert_eq!(window.earliest(), Some(window.week_start));

        let window = ReportWindow::new(date(24), ReportingPeriod::Month);
        assert_eq!(window.earliest(), Some(date(1)));

        assert_eq!(ReportWindow::new(date(24), ReportingPeriod::All).earliest(), None);
    }

    struct FakeRepo {
        counts: MockDashboardReader,
        orders: MockOrderReader,
        views: MockAnalyticsViewReader,
        raw: MockAnalyticsRawReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            let mut counts = MockDashboardReader::new();
            counts.expect_catalog_counts().returning(|| {
                Ok(CatalogCounts {
                    total_products: 2,
                    total_categories: 1,
                    pending_orders: 1,
                })
            });
            let mut orders = MockOrderReader::new();
            orders
                .expect_list_orders()
                .returning(|_| Ok((1, vec![completed_order(7, vec![item(1, "Rose Bouquet")])])));

            Self {
                counts,
                orders,
                views: MockAnalyticsViewReader::new(),
                raw: MockAnalyticsRawReader::new(),
            }
        }
    }

    impl DashboardReader for FakeRepo {
        fn catalog_counts(&self) -> RepositoryResult<CatalogCounts> {
            self.counts.catalog_counts()
        }
    }

    impl OrderReader for FakeRepo {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>> {
            self.orders.get_order_by_id(id)
        }

        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)> {
            self.orders.list_orders(query)
        }
    }

    impl AnalyticsViewReader for FakeRepo {
        fn check_analytics_views(&self) -> RepositoryResult<()> {
            self.views.check_analytics_views()
        }

        fn list_product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>> {
            self.views.list_product_summaries()
        }

        fn list_daily_revenue(
            &self,
            since: Option<NaiveDate>,
        ) -> RepositoryResult<Vec<DailyRevenue>> {
            self.views.list_daily_revenue(since)
        }

        fn list_category_performance(&self) -> RepositoryResult<Vec<CategoryPerformance>> {
            self.views.list_category_performance()
        }
    }

    impl AnalyticsRawReader for FakeRepo {
        fn list_stock_levels(&self) -> RepositoryResult<Vec<StockLevel>> {
            self.raw.list_stock_levels()
        }

        fn list_sales_lines(&self) -> RepositoryResult<Vec<SalesLine>> {
            self.raw.list_sales_lines()
        }

        fn list_order_headers(
            &self,
            since: Option<NaiveDateTime>,
        ) -> RepositoryResult<Vec<OrderHeader>> {
            self.raw.list_order_headers(since)
        }
    }

    #[test]
    fn load_dashboard_requires_role() {
        let repo = FakeRepo::new();
        let mut user = admin();
        user.roles.clear();

        let result = load_dashboard(&repo, &user, DashboardQuery::default(), date(24));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_dashboard_uses_views_when_healthy() {
        let mut repo = FakeRepo::new();
        repo.views.expect_check_analytics_views().returning(|| Ok(()));
        repo.views.expect_list_product_summaries().returning(|| {
            Ok(vec![
                ProductSalesSummary::new(1, "Rose Bouquet", 450_000, 9, 1, 450_000),
                ProductSalesSummary::new(2, "Wedding Flowers", 2_500_000, 0, 0, 0),
            ])
        });
        repo.views
            .expect_list_daily_revenue()
            .withf(|since| since.is_none())
            .returning(|_| {
                Ok(vec![
                    DailyRevenue {
                        revenue: 1_000_000,
                        completed_orders: 1,
                        total_orders: 1,
                        ..DailyRevenue::empty(date(1))
                    },
                    DailyRevenue {
                        revenue: 450_000,
                        completed_orders: 1,
                        total_orders: 1,
                        ..DailyRevenue::empty(date(23))
                    },
                ])
            });
        repo.views
            .expect_list_category_performance()
            .returning(|| Ok(Vec::new()));
        repo.raw.expect_list_stock_levels().times(0);

        let snapshot = load_dashboard(&repo, &admin(), DashboardQuery::default(), date(24))
            .expect("expected snapshot");

        assert_eq!(snapshot.source, DataSource::Views);
        assert!(snapshot.diagnostic.is_none());
        assert_eq!(snapshot.total_revenue, 1_450_000);
        assert_eq!(snapshot.week_revenue, 450_000);
        assert_eq!(snapshot.today_revenue, 0);
        assert_eq!(snapshot.products_out_of_stock, 1);
        assert_eq!(snapshot.top_products.len(), 1);
        assert_eq!(snapshot.recent_sales[0].product, "Rose Bouquet");
        assert_eq!(snapshot.category_performance, Some(Vec::new()));
    }

    #[test]
    fn load_dashboard_falls_back_when_views_are_missing() {
        let mut repo = FakeRepo::new();
        repo.views.expect_check_analytics_views().returning(|| {
            Err(RepositoryError::MissingSchema(
                "no such table: product_summary_view".to_string(),
            ))
        });
        repo.raw.expect_list_stock_levels().returning(|| {
            Ok(vec![StockLevel {
                product_id: 1,
                name: "Rose Bouquet".to_string(),
                price: 450_000,
                stock: 9,
            }])
        });
        repo.raw.expect_list_sales_lines().returning(|| {
            Ok(vec![SalesLine {
                product_id: 1,
                quantity: 1,
                total_price: 450_000,
                status: OrderStatus::Completed,
            }])
        });
        repo.raw
            .expect_list_order_headers()
            .returning(|_| Ok(vec![header(7, OrderStatus::Completed, 450_000, at(24, 9))]));

        let snapshot = load_dashboard(&repo, &admin(), DashboardQuery::default(), date(24))
            .expect("expected snapshot");

        assert_eq!(snapshot.source, DataSource::Fallback);
        let diagnostic = snapshot.diagnostic.expect("expected diagnostic");
        assert_eq!(diagnostic.code, "schema_missing");
        assert_eq!(snapshot.today_revenue, 450_000);
        assert_eq!(snapshot.total_revenue, 450_000);
        assert!(snapshot.category_performance.is_none());
    }

    #[test]
    fn load_dashboard_fails_when_both_paths_fail() {
        let mut repo = FakeRepo::new();
        repo.views
            .expect_check_analytics_views()
            .returning(|| Err(RepositoryError::MissingSchema("no such view".to_string())));
        repo.raw.expect_list_stock_levels().returning(|| {
            Err(RepositoryError::MissingSchema(
                "no such table: products".to_string(),
            ))
        });

        let result = load_dashboard(&repo, &admin(), DashboardQuery::default(), date(24));

        match result {
            Err(err) => assert_eq!(err.diagnostic_code(), Some("schema_missing")),
            Ok(_) => panic!("expected failure"),
        }
    }
}
