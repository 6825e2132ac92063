use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::categories::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{MessageBody, error_response};
use crate::services::categories;

#[get("/categories")]
pub async fn list_categories(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::list_categories(repo.get_ref(), &user) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(err, "fetch categories"),
    }
}

#[post("/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CategoryForm>,
) -> impl Responder {
    match categories::create_category(repo.get_ref(), &user, form.into_inner()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(err, "create category"),
    }
}

#[get("/categories/{category_id}")]
pub async fn get_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::get_category(repo.get_ref(), &user, category_id.into_inner()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err, "fetch category"),
    }
}

#[put("/categories/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CategoryForm>,
) -> impl Responder {
    match categories::update_category(
        repo.get_ref(),
        &user,
        category_id.into_inner(),
        form.into_inner(),
    ) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err, "update category"),
    }
}

#[delete("/categories/{category_id}")]
/// Detach the category from its products, then delete it.
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    match categories::delete_category(repo.get_ref(), &user, category_id) {
        Ok(()) => {
            log::info!("Category {category_id} deleted by {}", user.email);
            HttpResponse::Ok().json(MessageBody::new("Category deleted successfully"))
        }
        Err(err) => error_response(err, "delete category"),
    }
}
