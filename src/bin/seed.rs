//! Loads the demo catalog and a few backdated orders into the configured database.

use std::env;

use chrono::{Days, Local, NaiveDateTime};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use kembangku_admin::domain::order::{NewOrder, OrderStatus};
use kembangku_admin::domain::product::NewProduct;
use kembangku_admin::repository::{DieselRepository, OrderWriter, ProductWriter};
use kembangku_admin::run_migrations;
use kembangku_admin::schema::{order_items, orders, product_categories, products};

type SeedResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

struct SeedOrder {
    customer_name: &'static str,
    customer_email: &'static str,
    status: OrderStatus,
    product_index: usize,
}

const PRODUCTS: [(&str, i64, i32, &str); 6] = [
    (
        "Rose Bouquet",
        450_000,
        10,
        "Beautiful rose bouquet arrangement",
    ),
    (
        "Wedding Flowers",
        2_500_000,
        5,
        "Complete wedding flower package",
    ),
    (
        "Birthday Bundle",
        350_000,
        8,
        "Special birthday flower arrangement",
    ),
    (
        "Lily Arrangement",
        275_000,
        12,
        "Elegant lily flower arrangement",
    ),
    ("Orchid Collection", 550_000, 6, "Premium orchid collection"),
    (
        "Graduation Bouquet",
        300_000,
        10,
        "Graduation flower arrangement special for you",
    ),
];

const ORDERS: [SeedOrder; 5] = [
    SeedOrder {
        customer_name: "Marselino Ferdinand",
        customer_email: "marselino@gugel.com",
        status: OrderStatus::Completed,
        product_index: 0,
    },
    SeedOrder {
        customer_name: "Raisa Deathsquad",
        customer_email: "raisa@meta.com",
        status: OrderStatus::Pending,
        product_index: 1,
    },
    SeedOrder {
        customer_name: "Isyana Sarasvati",
        customer_email: "isyana@gmail.com",
        status: OrderStatus::Completed,
        product_index: 2,
    },
    SeedOrder {
        customer_name: "Maudy Elekro",
        customer_email: "maudy@dteti.ugm.ac.id",
        status: OrderStatus::Completed,
        product_index: 3,
    },
    SeedOrder {
        customer_name: "Tulus",
        customer_email: "tulus@gmail.com",
        status: OrderStatus::Pending,
        product_index: 4,
    },
];

fn clear_existing(conn: &mut SqliteConnection) -> SeedResult<()> {
    conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(order_items::table).execute(conn)?;
        diesel::delete(orders::table).execute(conn)?;
        diesel::delete(product_categories::table).execute(conn)?;
        diesel::delete(products::table).execute(conn)?;
        Ok(())
    })?;
    Ok(())
}

fn seed(repo: &DieselRepository, now: NaiveDateTime) -> SeedResult<()> {
    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, price, stock, description) in PRODUCTS {
        let product =
            repo.create_product(&NewProduct::new(name, price, stock).with_description(description))?;
        product_ids.push(product.id);
    }
    log::info!("Products created: {}", product_ids.len());

    for (days_ago, order) in (1u64..).zip(ORDERS.iter()) {
        let product_id = product_ids
            .get(order.product_index)
            .copied()
            .ok_or("seed order references an unknown product")?;
        let placed_at = now.checked_sub_days(Days::new(days_ago)).unwrap_or(now);
        let new_order = NewOrder::new(order.customer_name, order.customer_email)
            .with_phone(format!("08123456789{}", days_ago - 1))
            .with_line(product_id, 1)
            .with_status(order.status)
            .placed_at(placed_at);

        let placed = repo.place_order(&new_order)?;
        log::info!(
            "Order {} for {} created ({})",
            placed.order_number,
            placed.customer_name,
            placed.status
        );
    }
    log::info!("Orders created: {}", ORDERS.len());

    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let prepared = pool
        .get()
        .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })
        .and_then(|mut conn| {
            run_migrations(&mut conn)?;
            log::info!("Cleaning existing data...");
            clear_existing(&mut conn)
        });
    if let Err(e) = prepared {
        log::error!("Failed to prepare database: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);
    if let Err(e) = seed(&repo, Local::now().naive_utc()) {
        log::error!("Failed to seed database: {e}");
        std::process::exit(1);
    }

    log::info!("Seed completed successfully");
}
