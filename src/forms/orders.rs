use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{NewOrder, OrderStatus};
use crate::forms::sanitize_inline_text;

/// Maximum length allowed for a phone number.
const PHONE_MAX_LEN: usize = 32;
const PHONE_MAX_LEN_VALIDATOR: u64 = PHONE_MAX_LEN as u64;

/// Largest quantity accepted for a single product in one order.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing order payloads.
#[derive(Debug, Error)]
pub enum OrderFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The order does not contain any line.
    #[error("order must contain at least one item")]
    EmptyOrder,
    /// The phone number contains characters other than digits and separators.
    #[error("invalid phone number `{0}`")]
    InvalidPhone(String),
    /// The combined quantity of a product exceeds `MAX_LINE_QUANTITY`.
    #[error("quantity for product {0} is too large")]
    QuantityTooLarge(i32),
    /// The requested status is not a known order status.
    #[error("{0}")]
    InvalidStatus(String),
}

/// A requested product and quantity.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY))]
    pub quantity: i32,
}

/// JSON body accepted by the order placement endpoint.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderForm {
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<OrderLineForm>,
    #[validate(length(max = PHONE_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub customer_phone: Option<String>,
}

impl CreateOrderForm {
    /// Validates the payload and builds a pending order for the given customer.
    pub fn into_new_order(
        self,
        customer_name: &str,
        customer_email: &str,
    ) -> OrderFormResult<NewOrder> {
        if self.items.is_empty() {
            return Err(OrderFormError::EmptyOrder);
        }
        self.validate()?;

        let mut new_order = NewOrder::new(sanitize_inline_text(customer_name), customer_email.trim());

        if let Some(phone) = self.customer_phone.as_deref() {
            let phone = sanitize_inline_text(phone);
            if !phone.is_empty() {
                let valid = phone
                    .chars()
                    .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | ' ' | '(' | ')'));
                if !valid {
                    return Err(OrderFormError::InvalidPhone(phone));
                }
                new_order = new_order.with_phone(phone);
            }
        }

        for line in self.items {
            new_order = new_order.with_line(line.product_id, line.quantity);
        }
        if let Some(line) = new_order
            .lines
            .iter()
            .find(|line| line.quantity > MAX_LINE_QUANTITY)
        {
            return Err(OrderFormError::QuantityTooLarge(line.product_id));
        }

        Ok(new_order)
    }
}

/// JSON body accepted when changing the status of an order.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: String,
}

impl OrderStatusForm {
    /// Parse the requested status.
    pub fn into_status(self) -> OrderFormResult<OrderStatus> {
        self.status
            .parse::<OrderStatus>()
            .map_err(OrderFormError::InvalidStatus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, quantity: i32) -> OrderLineForm {
        OrderLineForm {
            product_id,
            quantity,
        }
    }

    #[test]
    fn create_order_form_merges_lines_and_keeps_phone() {
        let form = CreateOrderForm {
            items: vec![line(1, 2), line(4, 1), line(1, 1)],
            customer_phone: Some(" 0812-3456-7890 ".to_string()),
        };

        let order = form
            .into_new_order("Isyana Sarasvati", "isyana@gmail.com")
            .expect("expected conversion to succeed");

        assert_eq!(order.customer_name, "Isyana Sarasvati");
        assert_eq!(order.customer_phone.as_deref(), Some("0812-3456-7890"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].quantity, 3);
    }

    #[test]
    fn create_order_form_rejects_empty_items() {
        let form = CreateOrderForm {
            items: Vec::new(),
            customer_phone: None,
        };

        assert!(matches!(
            form.into_new_order("Tulus", "tulus@gmail.com"),
            Err(OrderFormError::EmptyOrder)
        ));
    }

    #[test]
    fn create_order_form_rejects_zero_quantity() {
        let form = CreateOrderForm {
            items: vec![line(1, 0)],
            customer_phone: None,
        };

        assert!(matches!(
            form.into_new_order("Tulus", "tulus@gmail.com"),
            Err(OrderFormError::Validation(_))
        ));
    }

    #[test]
    fn create_order_form_caps_quantities() {
        let form = CreateOrderForm {
            items: vec![line(1, i32::MAX), line(1, 1)],
            customer_phone: None,
        };
        assert!(matches!(
            form.into_new_order("Tulus", "tulus@gmail.com"),
            Err(OrderFormError::Validation(_))
        ));

        let form = CreateOrderForm {
            items: vec![line(1, MAX_LINE_QUANTITY), line(1, 1)],
            customer_phone: None,
        };
        assert!(matches!(
            form.into_new_order("Tulus", "tulus@gmail.com"),
            Err(OrderFormError::QuantityTooLarge(1))
        ));

        let form = CreateOrderForm {
            items: vec![line(1, MAX_LINE_QUANTITY - 1), line(1, 1)],
            customer_phone: None,
        };
        let order = form
            .into_new_order("Tulus", "tulus@gmail.com")
            .expect("expected conversion to succeed");
        assert_eq!(order.lines[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn create_order_form_rejects_letters_in_phone() {
        let form = CreateOrderForm {
            items: vec![line(1, 1)],
            customer_phone: Some("call me".to_string()),
        };

        assert!(matches!(
            form.into_new_order("Tulus", "tulus@gmail.com"),
            Err(OrderFormError::InvalidPhone(_))
        ));
    }

    #[test]
    fn status_form_parses_known_statuses() {
        let form = OrderStatusForm {
            status: "Completed".to_string(),
        };
        assert_eq!(form.into_status().ok(), Some(OrderStatus::Completed));

        let form = OrderStatusForm {
            status: "shipped".to_string(),
        };
        assert!(matches!(
            form.into_status(),
            Err(OrderFormError::InvalidStatus(_))
        ));
    }
}
