use std::env;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::models::config::CommonServerConfig;

use kembangku_admin::repository::DieselRepository;
use kembangku_admin::routes::catalog::{get_catalog_product, list_catalog};
use kembangku_admin::routes::categories::{
    create_category, delete_category, get_category, list_categories, update_category,
};
use kembangku_admin::routes::dashboard::show_dashboard;
use kembangku_admin::routes::orders::{create_order, list_orders, update_order_status};
use kembangku_admin::routes::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use kembangku_admin::routes::{json_error_handler, path_error_handler, query_error_handler};
use kembangku_admin::run_migrations;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = env::var("AUTH_SERVICE_URL");
    let auth_service_url = match auth_service_url {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = run_migrations(&mut conn) {
                log::error!("Failed to run migrations: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get a database connection: {e}");
            std::process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(
                web::scope("/api/admin")
                    .service(show_dashboard)
                    .service(list_products)
                    .service(create_product)
                    .service(get_product)
                    .service(update_product)
                    .service(delete_product)
                    .service(list_categories)
                    .service(create_category)
                    .service(get_category)
                    .service(update_category)
                    .service(delete_category)
                    .service(list_orders)
                    .service(update_order_status),
            )
            .service(
                web::scope("/api/users")
                    .service(list_catalog)
                    .service(get_catalog_product)
                    .service(create_order),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
