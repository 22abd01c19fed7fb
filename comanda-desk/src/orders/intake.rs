//! Order intake

use super::error::OrderError;
use super::money;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::order::{DateValue, Order, OrderProduct, OrderStatus, OrderType, PaymentMethod};

/// New order as submitted by the storefront or the counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub address: Option<String>,
    pub products: Vec<OrderProduct>,
}

impl OrderDraft {
    pub fn validate(&self) -> Result<(), OrderError> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.notes, "notes", MAX_NOTE_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;

        if self.products.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        for item in &self.products {
            money::validate_line_item(item)?;
        }
        Ok(())
    }

    /// Build the stored order: `pendiente`, dated `now`, total from lines
    pub fn into_order(self, now: DateTime<Utc>) -> Result<Order, OrderError> {
        let total = money::compute_total(&self.products)?;
        Ok(Order {
            id: None,
            name: self.name.trim().to_string(),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            payment_method: self.payment_method,
            order_type: self.order_type,
            address: self.address.filter(|a| !a.trim().is_empty()),
            status: OrderStatus::Pendiente,
            date: Some(DateValue::from_instant(now)),
            products: self.products,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn taco(quantity: u32) -> OrderProduct {
        OrderProduct {
            product_id: "p1".into(),
            product_name: "Taco".into(),
            variant_id: "v1".into(),
            variant_label: "Pastor".into(),
            price: Decimal::new(2550, 2),
            quantity,
            image: String::new(),
            additions: None,
            total: None,
        }
    }

    fn draft(products: Vec<OrderProduct>) -> OrderDraft {
        OrderDraft {
            name: " Ana ".into(),
            notes: Some("".into()),
            payment_method: Some(PaymentMethod::new("Efectivo")),
            order_type: Some(OrderType::Llevar),
            address: None,
            products,
        }
    }

    #[test]
    fn test_valid_draft_becomes_pending_order() {
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 13, 0, 0).unwrap();
        let d = draft(vec![taco(2)]);
        d.validate().unwrap();

        let order = d.into_order(now).unwrap();
        assert_eq!(order.status, OrderStatus::Pendiente);
        assert_eq!(order.name, "Ana");
        assert_eq!(order.notes, None);
        assert_eq!(order.total, Decimal::new(51, 0));
        assert_eq!(order.created_at(chrono_tz::Tz::UTC), Some(now));
        assert!(order.payment_method.unwrap().is_cash());
    }

    #[test]
    fn test_rejects_empty_orders() {
        assert!(matches!(draft(vec![]).validate(), Err(OrderError::EmptyOrder)));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        assert!(draft(vec![taco(1), taco(0)]).validate().is_err());
    }

    #[test]
    fn test_rejects_blank_name() {
        let mut d = draft(vec![taco(1)]);
        d.name = "  ".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_overflowing_explicit_totals_rejected() {
        let mut first = taco(1);
        first.total = Some(Decimal::MAX);
        let mut second = taco(1);
        second.total = Some(Decimal::MAX);

        let d = draft(vec![first, second]);
        d.validate().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 13, 0, 0).unwrap();
        assert!(matches!(d.into_order(now), Err(OrderError::Validation(_))));
    }
}
