use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use diesel::RunQueryDsl;

use kembangku_admin::domain::category::NewCategory;
use kembangku_admin::domain::dashboard::{DashboardSnapshot, DataSource, ReportingPeriod};
use kembangku_admin::domain::order::{NewOrder, OrderStatus};
use kembangku_admin::domain::product::NewProduct;
use kembangku_admin::repository::{CategoryWriter, DieselRepository, OrderWriter, ProductWriter};
use kembangku_admin::services::dashboard::{DashboardQuery, load_dashboard};

mod common;

fn days_ago(today: NaiveDate, days: u64) -> NaiveDateTime {
    today
        .checked_sub_days(Days::new(days))
        .and_then(|date| date.and_hms_opt(10, 30, 0))
        .unwrap()
}

/// Six products, two categories and seven orders, two of them pending and one outside the week.
fn seed(repo: &DieselRepository, today: NaiveDate) {
    let bouquets = repo.create_category(&NewCategory::new("Bouquets")).unwrap();
    let events = repo.create_category(&NewCategory::new("Events")).unwrap();

    let catalog = [
        ("Rose Bouquet", 450_000, 10, vec![bouquets.id]),
        ("Wedding Flowers", 2_500_000, 5, vec![events.id]),
        ("Birthday Bundle", 350_000, 8, vec![bouquets.id, events.id]),
        ("Lily Arrangement", 275_000, 12, vec![]),
        ("Orchid Collection", 550_000, 6, vec![]),
        ("Graduation Bouquet", 300_000, 1, vec![bouquets.id]),
    ];
    let ids: Vec<i32> = catalog
        .into_iter()
        .map(|(name, price, stock, categories)| {
            repo.create_product(&NewProduct::new(name, price, stock).with_category_ids(categories))
                .unwrap()
                .id
        })
        .collect();

    let orders = [
        ("Marselino Ferdinand", OrderStatus::Completed, ids[0], 2, 1),
        ("Raisa Deathsquad", OrderStatus::Pending, ids[1], 1, 2),
        ("Isyana Sarasvati", OrderStatus::Completed, ids[2], 1, 3),
        ("Maudy Elekro", OrderStatus::Completed, ids[3], 3, 4),
        ("Tulus", OrderStatus::Pending, ids[4], 1, 5),
        ("Marselino Ferdinand", OrderStatus::Completed, ids[0], 1, 0),
        ("Isyana Sarasvati", OrderStatus::Completed, ids[2], 1, 40),
    ];
    for (name, status, product_id, quantity, age) in orders {
        repo.place_order(
            &NewOrder::new(name, "customer@kembangku.id")
                .with_line(product_id, quantity)
                .with_status(status)
                .placed_at(days_ago(today, age)),
        )
        .unwrap();
    }
}

fn assert_same_figures(views: &DashboardSnapshot, fallback: &DashboardSnapshot) {
    assert_eq!(views.total_products, fallback.total_products);
    assert_eq!(views.total_categories, fallback.total_categories);
    assert_eq!(views.total_revenue, fallback.total_revenue);
    assert_eq!(views.today_revenue, fallback.today_revenue);
    assert_eq!(views.week_revenue, fallback.week_revenue);
    assert_eq!(views.pending_orders, fallback.pending_orders);
    assert_eq!(views.products_in_stock, fallback.products_in_stock);
    assert_eq!(views.products_low_stock, fallback.products_low_stock);
    assert_eq!(views.products_out_of_stock, fallback.products_out_of_stock);
    assert_eq!(views.top_products, fallback.top_products);
    assert_eq!(views.low_stock_products, fallback.low_stock_products);
    assert_eq!(views.weekly_revenue_details, fallback.weekly_revenue_details);
    assert_eq!(views.recent_sales, fallback.recent_sales);
}

#[test]
fn dashboard_reads_views_and_reports_the_week() {
    let test_db = common::TestDb::new("test_dashboard_reads_views.db");
    let repo = DieselRepository::new(test_db.pool());
    let today = Utc::now().date_naive();
    seed(&repo, today);

    let snapshot = load_dashboard(&repo, &common::admin(), DashboardQuery::default(), today)
        .unwrap();

    assert_eq!(snapshot.source, DataSource::Views);
    assert!(snapshot.diagnostic.is_none());
    assert_eq!(snapshot.total_products, 6);
    assert_eq!(snapshot.total_categories, 2);
    assert_eq!(snapshot.pending_orders, 2);
    assert_eq!(
        snapshot.total_revenue,
        2 * 450_000 + 350_000 + 3 * 275_000 + 450_000 + 350_000
    );
    assert_eq!(snapshot.today_revenue, 450_000);
    assert_eq!(
        snapshot.week_revenue,
        2 * 450_000 + 350_000 + 3 * 275_000 + 450_000
    );

    assert_eq!(snapshot.weekly_revenue_details.len(), 7);
    assert_eq!(snapshot.weekly_revenue_details[6].date, today);
    assert!(
        snapshot
            .weekly_revenue_details
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date)
    );

    let top: Vec<&str> = snapshot
        .top_products
        .iter()
        .map(|product| product.name.as_str())
        .collect();
    assert_eq!(top, vec!["Rose Bouquet", "Lily Arrangement", "Birthday Bundle"]);

    assert_eq!(snapshot.recent_sales.len(), 5);
    assert_eq!(snapshot.recent_sales[0].date, today);
    assert_eq!(snapshot.recent_sales[0].product, "Rose Bouquet");

    let categories = snapshot.category_performance.expect("expected categories");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Bouquets");
    assert_eq!(categories[0].product_count, 3);
}

#[test]
fn month_period_limits_total_revenue() {
    let test_db = common::TestDb::new("test_month_period_limits_total_revenue.db");
    let repo = DieselRepository::new(test_db.pool());
    let today = Utc::now().date_naive();
    seed(&repo, today);

    let all = load_dashboard(&repo, &common::admin(), DashboardQuery::default(), today).unwrap();
    let month = load_dashboard(
        &repo,
        &common::admin(),
        DashboardQuery {
            period: ReportingPeriod::Month,
        },
        today,
    )
    .unwrap();

    assert_eq!(month.period, ReportingPeriod::Month);
    assert!(month.total_revenue < all.total_revenue);
    assert_eq!(month.week_revenue, all.week_revenue);
}

#[test]
fn dashboard_falls_back_to_raw_tables_with_equal_figures() {
    let test_db = common::TestDb::new("test_dashboard_falls_back.db");
    let repo = DieselRepository::new(test_db.pool());
    let today = Utc::now().date_naive();
    seed(&repo, today);

    let views = load_dashboard(&repo, &common::admin(), DashboardQuery::default(), today).unwrap();
    assert_eq!(views.source, DataSource::Views);

    {
        let mut conn = test_db.pool().get().unwrap();
        for view in [
            "product_summary_view",
            "daily_revenue_view",
            "category_performance_view",
        ] {
            diesel::sql_query(format!("DROP VIEW {view}"))
                .execute(&mut conn)
                .unwrap();
        }
    }

    let fallback =
        load_dashboard(&repo, &common::admin(), DashboardQuery::default(), today).unwrap();

    assert_eq!(fallback.source, DataSource::Fallback);
    let diagnostic = fallback.diagnostic.clone().expect("expected diagnostic");
    assert_eq!(diagnostic.code, "schema_missing");
    assert!(fallback.category_performance.is_none());
    assert_same_figures(&views, &fallback);
}

#[test]
fn empty_shop_still_reports_seven_days() {
    let test_db = common::TestDb::new("test_empty_shop_still_reports_seven_days.db");
    let repo = DieselRepository::new(test_db.pool());
    let today = Utc::now().date_naive();

    let snapshot = load_dashboard(&repo, &common::admin(), DashboardQuery::default(), today)
        .unwrap();

    assert_eq!(snapshot.weekly_revenue_details.len(), 7);
    assert!(
        snapshot
            .weekly_revenue_details
            .iter()
            .all(|entry| entry.revenue == 0 && entry.order_count == 0)
    );
    assert!(snapshot.top_products.is_empty());
    assert!(snapshot.recent_sales.is_empty());
    assert_eq!(snapshot.total_revenue, 0);
}
