use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::dashboard::{self, DashboardQuery};

#[get("/dashboard")]
/// Return the dashboard snapshot as of the current UTC date.
///
/// Users without the role stored in `crate::SERVICE_ACCESS_ROLE` receive a `401 Unauthorized` response.
pub async fn show_dashboard(
    params: web::Query<DashboardQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let today = Utc::now().date_naive();
    match dashboard::load_dashboard(repo.get_ref(), &user, params.into_inner(), today) {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => error_response(err, "load dashboard"),
    }
}
