use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{Order as DomainOrder, OrderItem as DomainOrderItem};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub total_amount: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: i64,
    pub total_price: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: Option<&'a str>,
    pub total_amount: i64,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: i64,
    pub total_price: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct UpdateOrderStatus<'a> {
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Order {
    /// Combine the order row with its items and their product names.
    pub fn into_domain(self, items: Vec<(OrderItem, String)>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            total_amount: self.total_amount,
            status: self.status.parse().unwrap_or_default(),
            items: items
                .into_iter()
                .map(|(item, product_name)| item.into_domain(product_name))
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self, product_name: String) -> DomainOrderItem {
        DomainOrderItem {
            id: self.id,
            product_id: self.product_id,
            product_name,
            quantity: self.quantity,
            price: self.price,
            total_price: self.total_price,
        }
    }
}
