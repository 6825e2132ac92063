use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::{
    domain::dashboard::{
        CatalogCounts, CategoryPerformance, DailyRevenue, OrderHeader, ProductSalesSummary,
        SalesLine, StockLevel,
    },
    domain::order::OrderStatus,
    models::analytics::{
        CategoryPerformanceRow, DailyRevenueRow, OrderHeaderRow, ProductSummaryRow, SalesLineRow,
        StockRow, sales_line_from_row,
    },
    repository::{
        AnalyticsRawReader, AnalyticsViewReader, DashboardReader, DieselRepository,
        RepositoryResult,
    },
};

impl DashboardReader for DieselRepository {
    fn catalog_counts(&self) -> RepositoryResult<CatalogCounts> {
        use crate::schema::{categories, orders, products};

        let mut conn = self.conn()?;

        let total_products = products::table.count().get_result::<i64>(&mut conn)?;
        let total_categories = categories::table.count().get_result::<i64>(&mut conn)?;
        let pending_orders = orders::table
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(CatalogCounts {
            total_products,
            total_categories,
            pending_orders,
        })
    }
}

impl AnalyticsViewReader for DieselRepository {
    fn check_analytics_views(&self) -> RepositoryResult<()> {
        use crate::schema::{category_performance_view, daily_revenue_view, product_summary_view};

        let mut conn = self.conn()?;

        product_summary_view::table
            .select(product_summary_view::product_id)
            .limit(1)
            .load::<i32>(&mut conn)?;
        daily_revenue_view::table
            .select(daily_revenue_view::day)
            .limit(1)
            .load::<NaiveDate>(&mut conn)?;
        category_performance_view::table
            .select(category_performance_view::category_id)
            .limit(1)
            .load::<i32>(&mut conn)?;

        Ok(())
    }

    fn list_product_summaries(&self) -> RepositoryResult<Vec<ProductSalesSummary>> {
        use crate::schema::product_summary_view;

        let mut conn = self.conn()?;
        let rows = product_summary_view::table
            .order(product_summary_view::product_id.asc())
            .select(ProductSummaryRow::as_select())
            .load::<ProductSummaryRow>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_daily_revenue(&self, since: Option<NaiveDate>) -> RepositoryResult<Vec<DailyRevenue>> {
        use crate::schema::daily_revenue_view;

        let mut conn = self.conn()?;
        let mut query = daily_revenue_view::table
            .select(DailyRevenueRow::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(since) = since {
            query = query.filter(daily_revenue_view::day.ge(since));
        }

        let rows = query
            .order(daily_revenue_view::day.asc())
            .load::<DailyRevenueRow>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_category_performance(&self) -> RepositoryResult<Vec<CategoryPerformance>> {
        use crate::schema::category_performance_view;

        let mut conn = self.conn()?;
        let rows = category_performance_view::table
            .order((
                category_performance_view::total_revenue.desc(),
                category_performance_view::category_id.asc(),
            ))
            .select(CategoryPerformanceRow::as_select())
            .load::<CategoryPerformanceRow>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl AnalyticsRawReader for DieselRepository {
    fn list_stock_levels(&self) -> RepositoryResult<Vec<StockLevel>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let rows = products::table
            .order(products::id.asc())
            .select(StockRow::as_select())
            .load::<StockRow>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_sales_lines(&self) -> RepositoryResult<Vec<SalesLine>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;
        let rows = order_items::table
            .inner_join(orders::table)
            .select((
                order_items::product_id,
                order_items::quantity,
                order_items::total_price,
                orders::status,
            ))
            .load::<SalesLineRow>(&mut conn)?;

        Ok(rows.into_iter().map(sales_line_from_row).collect())
    }

    fn list_order_headers(
        &self,
        since: Option<NaiveDateTime>,
    ) -> RepositoryResult<Vec<OrderHeader>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let mut query = orders::table
            .select(OrderHeaderRow::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(since) = since {
            query = query.filter(orders::created_at.ge(since));
        }

        let rows = query
            .order(orders::created_at.asc())
            .load::<OrderHeaderRow>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
