//! Loose deserializers for order documents
//!
//! Stored orders are written by several clients. Numbers may arrive as
//! floats (`1.0`) or `null`, and some older documents omit fields entirely.

use super::types::OrderType;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(u64),
    Float(f64),
}

/// Default quantity when the field is missing
pub fn default_quantity() -> u32 {
    1
}

/// Quantity from an integer or a float; null counts as 1
///
/// Negative and non-finite values become 0, large values saturate.
pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = match Option::<LooseNumber>::deserialize(deserializer)? {
        None => default_quantity(),
        Some(LooseNumber::Int(n)) => u32::try_from(n).unwrap_or(u32::MAX),
        // `as` saturates
        Some(LooseNumber::Float(f)) if f.is_finite() && f > 0.0 => f.round() as u32,
        Some(LooseNumber::Float(_)) => 0,
    };
    Ok(quantity)
}

/// Decimal that treats null as zero
pub fn money<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Order type; unknown labels and non-string values read as unspecified
pub fn order_type<'de, D>(deserializer: D) -> Result<Option<OrderType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(OrderType::from_label))
}
