//! Delivery Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery fee settings (`deliverySettings` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub delivery_price: Decimal,
    #[serde(default)]
    pub active: bool,
}

/// Courier (`deliveryUsers` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
