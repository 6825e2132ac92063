use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Prefix used for generated order numbers.
pub const ORDER_NUMBER_PREFIX: &str = "BELI";

/// Possible lifecycle states for an order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed and awaits fulfilment.
    #[default]
    Pending,
    /// Order has been fulfilled; only completed orders count as revenue.
    Completed,
    /// Order has been cancelled and its stock returned.
    Cancelled,
}

impl OrderStatus {
    /// Storage representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only pending orders may move, and only to a final state.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

/// Line item of an order with the price captured when the order was placed.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i32,
    pub product_id: i32,
    /// Current name of the referenced product.
    pub product_name: String,
    pub quantity: i32,
    /// Unit price at the time of the order.
    pub price: i64,
    /// `price * quantity`.
    pub total_price: i64,
}

/// Domain representation of a customer order.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Human-friendly reference such as `BELI-20250524-0001`.
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Sum of the line totals in the smallest currency unit.
    pub total_amount: i64,
    /// Current lifecycle status of the order.
    pub status: OrderStatus,
    /// Line items in insertion order.
    pub items: Vec<OrderItem>,
    /// Timestamp for when the order was placed.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the order record.
    pub updated_at: NaiveDateTime,
}

/// Requested product and quantity for a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: i32,
    pub quantity: i32,
}

/// Payload required to place a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Requested lines; each product appears at most once.
    pub lines: Vec<NewOrderLine>,
    /// Initial status of the order.
    pub status: OrderStatus,
    /// Creation timestamp; defaults to now.
    pub created_at: NaiveDateTime,
}

impl NewOrder {
    /// Build a pending order payload for the given customer placed now.
    pub fn new(customer_name: impl Into<String>, customer_email: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            customer_phone: None,
            lines: Vec::new(),
            status: OrderStatus::Pending,
            created_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Attach a contact phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    /// Add a line, merging it with an existing line for the same product.
    ///
    /// Merged quantities saturate at `i32::MAX`.
    pub fn with_line(mut self, product_id: i32, quantity: i32) -> Self {
        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(NewOrderLine {
                product_id,
                quantity,
            }),
        }
        self
    }

    /// Override the initial status, used when importing historical orders.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Override the creation timestamp, used when importing historical orders.
    pub fn placed_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Build the order number of an order placed on `date`.
///
/// `sequence` is the row identifier the order receives, which keeps numbers unique.
pub fn order_number(date: NaiveDate, sequence: i32) -> String {
    format!(
        "{ORDER_NUMBER_PREFIX}-{}-{sequence:04}",
        date.format("%Y%m%d")
    )
}

/// Query definition used to list orders, newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Optional status filter.
    pub status: Option<OrderStatus>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query that targets every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
