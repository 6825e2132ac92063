use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use pushkind_common::routes::check_role;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::forms::orders::{CreateOrderForm, OrderStatusForm};
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the admin order listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Optional status filter such as `pending`.
    pub status: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// One page of orders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Places an order on behalf of the authenticated customer.
///
/// Validation happens before the repository is touched; stock is checked and
/// decremented by the repository inside a single transaction.
pub fn place_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateOrderForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    let new_order = form
        .into_new_order(&user.name, &user.email)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo.place_order(&new_order).map_err(ServiceError::from)?;
    log::info!(
        "Order {} placed by {} for {}",
        order.order_number,
        order.customer_email,
        order.total_amount
    );

    Ok(order)
}

/// Lists orders, newest first, optionally filtered by status.
pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPage>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1).max(1);
    let mut list_query = OrderListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status) = query.status.filter(|value| !value.trim().is_empty()) {
        let status = status
            .parse::<OrderStatus>()
            .map_err(ServiceError::Form)?;
        list_query = list_query.status(status);
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    Ok(OrdersPage {
        orders,
        total,
        page,
        total_pages: total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
    })
}

/// Moves a pending order to `completed` or `cancelled`.
pub fn update_order_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: OrderStatusForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let next = form
        .into_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::NotFound(format!("order {order_id} not found")))?;

    if !order.status.can_transition_to(next) {
        return Err(ServiceError::InvalidRequest(format!(
            "order {} cannot move from {} to {next}",
            order.order_number, order.status
        )));
    }

    repo.update_order_status(order_id, next)
        .map_err(ServiceError::from)
}
