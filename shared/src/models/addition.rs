//! Addition Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line-item modifier offered for a category (`additions` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Category reference (document id)
    #[serde(default)]
    pub category: String,
    /// Price delta: positive adds, negative subtracts
    pub price: Decimal,
}

