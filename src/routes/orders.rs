use actix_web::{HttpResponse, Responder, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::orders::{CreateOrderForm, OrderStatusForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::orders;

#[get("/orders")]
pub async fn list_orders(
    params: web::Query<orders::OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match orders::list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "fetch orders"),
    }
}

#[put("/orders/{order_id}/status")]
pub async fn update_order_status(
    order_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<OrderStatusForm>,
) -> impl Responder {
    match orders::update_order_status(
        repo.get_ref(),
        &user,
        order_id.into_inner(),
        form.into_inner(),
    ) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, "update order status"),
    }
}

#[post("/create-order")]
/// Place an order for the authenticated customer.
pub async fn create_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CreateOrderForm>,
) -> impl Responder {
    match orders::place_order(repo.get_ref(), &user, form.into_inner()) {
        Ok(order) => HttpResponse::Created().json(order),
        Err(err) => error_response(err, "create order"),
    }
}
