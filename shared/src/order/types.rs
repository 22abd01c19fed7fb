//! Order document types

use super::date::DateValue;
use super::payment::PaymentMethod;
use super::serde_helpers;
use super::status::OrderStatus;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the customer receives the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderType {
    /// Take-away
    Llevar,
    /// Dine-in
    ComerAca,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Llevar => "llevar",
            OrderType::ComerAca => "comerAca",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "llevar" => Some(OrderType::Llevar),
            "comerAca" => Some(OrderType::ComerAca),
            _ => None,
        }
    }
}

/// Price-delta modifier attached to a line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAddition {
    pub id: String,
    pub name: String,
    /// May be negative
    pub price: Decimal,
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub variant_id: String,
    #[serde(default)]
    pub variant_label: String,
    /// Unit price
    #[serde(default, deserialize_with = "serde_helpers::money")]
    pub price: Decimal,
    #[serde(
        default = "serde_helpers::default_quantity",
        deserialize_with = "serde_helpers::quantity"
    )]
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additions: Option<Vec<OrderAddition>>,
    /// Explicit line total; overrides `price × quantity` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

/// Order document
///
/// Lives in `restaurants/{id}/orders` while it moves through the kitchen
/// and in `restaurants/{id}/orderssuccess` once settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id (assigned by the store, not part of the document body)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Customer / display name
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::order_type"
    )]
    pub order_type: Option<OrderType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "state")]
    pub status: OrderStatus,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateValue>,
    #[serde(default)]
    pub products: Vec<OrderProduct>,
    /// Stored aggregate; line items are the source of truth
    #[serde(default, deserialize_with = "serde_helpers::money")]
    pub total: Decimal,
}

impl Order {
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Creation instant, if the stored date is parseable
    pub fn created_at(&self, tz: Tz) -> Option<DateTime<Utc>> {
        self.date.as_ref().and_then(|d| d.to_instant(tz))
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
