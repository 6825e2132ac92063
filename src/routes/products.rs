use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::products::ProductForm;
use crate::repository::DieselRepository;
use crate::routes::{MessageBody, error_response};
use crate::services::products;

#[get("/products")]
/// List products with optional `search` and `category` filters.
pub async fn list_products(
    params: web::Query<products::ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), &user, params.into_inner()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err, "fetch products"),
    }
}

#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<ProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), &user, form.into_inner()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err, "create product"),
    }
}

#[get("/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::get_product(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "fetch product"),
    }
}

#[put("/products/{product_id}")]
/// Replace every field of a product, categories included.
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<ProductForm>,
) -> impl Responder {
    match products::update_product(
        repo.get_ref(),
        &user,
        product_id.into_inner(),
        form.into_inner(),
    ) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "update product"),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    match products::delete_product(repo.get_ref(), &user, product_id) {
        Ok(()) => {
            log::info!("Product {product_id} deleted by {}", user.email);
            HttpResponse::Ok().json(MessageBody::new("Product deleted successfully"))
        }
        Err(err) => error_response(err, "delete product"),
    }
}
