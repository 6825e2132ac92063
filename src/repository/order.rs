use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::order::{
        NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus,
        order_number,
    },
    models::order::{
        NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
        OrderItem as DbOrderItem, UpdateOrderStatus as DbUpdateOrderStatus,
    },
    models::product::Product as DbProduct,
    repository::{DieselRepository, OrderReader, OrderWriter, RepositoryError, RepositoryResult},
};

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        load_order(&mut conn, id)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let mut count_query = orders::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status) = query.status {
            count_query = count_query.filter(orders::status.eq(status.as_str()));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = orders::table
            .select(DbOrder::as_select())
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status) = query.status {
            items = items.filter(orders::status.eq(status.as_str()));
        }

        items = items.order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();
        let mut item_map = load_items_for_orders(&mut conn, &order_ids)?;

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let items = item_map.remove(&order.id).unwrap_or_default();
                order.into_domain(items)
            })
            .collect();

        Ok((total, orders))
    }
}

impl OrderWriter for DieselRepository {
    fn place_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let mut lines = Vec::with_capacity(new_order.lines.len());
            for line in &new_order.lines {
                let product = products::table
                    .find(line.product_id)
                    .select(DbProduct::as_select())
                    .first::<DbProduct>(conn)
                    .optional()?
                    .ok_or(RepositoryError::ProductNotFound(line.product_id))?;

                if product.stock < line.quantity {
                    return Err(RepositoryError::InsufficientStock {
                        product_id: product.id,
                        available: product.stock,
                        requested: line.quantity,
                    });
                }

                let price = product.price;
                let line_total = price
                    .checked_mul(i64::from(line.quantity))
                    .ok_or(RepositoryError::AmountOverflow(product.id))?;
                lines.push((*line, price, line_total));
            }

            for (line, _, _) in &lines {
                let decremented = diesel::update(
                    products::table
                        .filter(products::id.eq(line.product_id))
                        .filter(products::stock.ge(line.quantity)),
                )
                .set(products::stock.eq(products::stock - line.quantity))
                .execute(conn)?;

                if decremented != 1 {
                    let available = products::table
                        .find(line.product_id)
                        .select(products::stock)
                        .first::<i32>(conn)
                        .optional()?
                        .unwrap_or_default();
                    return Err(RepositoryError::InsufficientStock {
                        product_id: line.product_id,
                        available,
                        requested: line.quantity,
                    });
                }
            }

            let last_id = orders::table
                .select(diesel::dsl::max(orders::id))
                .first::<Option<i32>>(conn)?
                .unwrap_or_default();
            let number = order_number(new_order.created_at.date(), last_id + 1);
            let total_amount = lines
                .iter()
                .try_fold(0i64, |total, (line, _, line_total)| {
                    total
                        .checked_add(*line_total)
                        .ok_or(RepositoryError::AmountOverflow(line.product_id))
                })?;

            let db_order = DbNewOrder {
                order_number: number.as_str(),
                customer_name: new_order.customer_name.as_str(),
                customer_email: new_order.customer_email.as_str(),
                customer_phone: new_order.customer_phone.as_deref(),
                total_amount,
                status: new_order.status.as_str(),
                created_at: new_order.created_at,
                updated_at: new_order.created_at,
            };

            let created = diesel::insert_into(orders::table)
                .values(&db_order)
                .returning(DbOrder::as_returning())
                .get_result::<DbOrder>(conn)?;

            let db_items: Vec<DbNewOrderItem> = lines
                .iter()
                .map(|(line, price, line_total)| DbNewOrderItem {
                    order_id: created.id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: *price,
                    total_price: *line_total,
                })
                .collect();

            if !db_items.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&db_items)
                    .execute(conn)?;
            }

            let mut item_map = load_items_for_orders(conn, &[created.id])?;
            let items = item_map.remove(&created.id).unwrap_or_default();
            Ok(created.into_domain(items))
        })
    }

    fn update_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let current = orders::table
                .find(order_id)
                .select(orders::status)
                .first::<String>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let current: OrderStatus = current.parse().map_err(|err| {
                RepositoryError::Conflict(format!("order {order_id} has a corrupt status: {err}"))
            })?;
            if !current.can_transition_to(status) {
                return Err(RepositoryError::Conflict(format!(
                    "order {order_id} cannot move from {current} to {status}"
                )));
            }

            let changes = DbUpdateOrderStatus {
                status: status.as_str(),
                updated_at: chrono::Local::now().naive_utc(),
            };
            diesel::update(
                orders::table
                    .filter(orders::id.eq(order_id))
                    .filter(orders::status.eq(current.as_str())),
            )
            .set(&changes)
            .execute(conn)?;

            if status == OrderStatus::Cancelled {
                let lines = order_items::table
                    .filter(order_items::order_id.eq(order_id))
                    .select((order_items::product_id, order_items::quantity))
                    .load::<(i32, i32)>(conn)?;

                for (product_id, quantity) in lines {
                    diesel::update(products::table.find(product_id))
                        .set(products::stock.eq(products::stock + quantity))
                        .execute(conn)?;
                }
            }

            load_order(conn, order_id)?.ok_or(RepositoryError::NotFound)
        })
    }
}

fn load_order(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<Option<DomainOrder>> {
    use crate::schema::orders;

    let order = orders::table
        .find(order_id)
        .select(DbOrder::as_select())
        .first::<DbOrder>(conn)
        .optional()?;

    match order {
        Some(order) => {
            let mut item_map = load_items_for_orders(conn, &[order.id])?;
            let items = item_map.remove(&order.id).unwrap_or_default();
            Ok(Some(order.into_domain(items)))
        }
        None => Ok(None),
    }
}

fn load_items_for_orders(
    conn: &mut SqliteConnection,
    order_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<(DbOrderItem, String)>>> {
    use crate::schema::{order_items, products};

    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = order_items::table
        .inner_join(products::table)
        .filter(order_items::order_id.eq_any(order_ids))
        .order(order_items::id.asc())
        .select((DbOrderItem::as_select(), products::name))
        .load::<(DbOrderItem, String)>(conn)?;

    let mut map: HashMap<i32, Vec<(DbOrderItem, String)>> = HashMap::new();
    for (item, product_name) in rows {
        map.entry(item.order_id).or_default().push((item, product_name));
    }

    Ok(map)
}
