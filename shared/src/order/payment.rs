//! Payment method labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method label
///
/// Open set: the well-known labels are `efectivo`, `tarjeta`,
/// `transferencia` and `otro`, but any label is accepted. Labels are
/// lowercased on construction and on deserialization, so comparisons are
/// case-insensitive. No payment gateway is involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PaymentMethod(String);

impl PaymentMethod {
    pub const CASH: &'static str = "efectivo";
    pub const CARD: &'static str = "tarjeta";
    pub const TRANSFER: &'static str = "transferencia";
    pub const OTHER: &'static str = "otro";

    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_lowercase())
    }

    pub fn cash() -> Self {
        Self(Self::CASH.to_string())
    }

    pub fn card() -> Self {
        Self(Self::CARD.to_string())
    }

    pub fn transfer() -> Self {
        Self(Self::TRANSFER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cash payments carry a tendered amount and produce change
    pub fn is_cash(&self) -> bool {
        self.0 == Self::CASH
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.0
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
