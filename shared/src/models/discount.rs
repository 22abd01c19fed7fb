//! Discount Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// Discount entity (`discounts` collection)
///
/// Stored for the storefront; the order desk does not apply discounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub value: Decimal,
    /// Higher priority wins
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let discount: Discount = serde_json::from_str(
            r#"{"title": "2x1", "type": "percentage", "value": 50, "priority": 1,
                "active": true, "productIds": ["p1"]}"#,
        )
        .unwrap();
        assert_eq!(discount.discount_type, DiscountType::Percentage);
        assert_eq!(discount.product_ids, vec!["p1".to_string()]);

        let value = serde_json::to_value(&discount).unwrap();
        assert_eq!(value["type"], "percentage");
        assert!(value.get("productIds").is_some());
    }
}
