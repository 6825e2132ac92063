use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::catalog;
use crate::services::products::ProductsQuery;

#[get("/products")]
pub async fn list_catalog(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog::list_catalog(repo.get_ref(), params.into_inner()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err, "fetch products"),
    }
}

#[get("/products/{product_id}")]
pub async fn get_catalog_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog::get_catalog_product(repo.get_ref(), product_id.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "fetch product"),
    }
}
