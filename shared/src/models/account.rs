//! Account Model

use crate::order::DateValue;
use serde::{Deserialize, Serialize};

/// Role written for self-registered accounts
pub const DEFAULT_ACCOUNT_ROLE: &str = "user";

/// Login account record (top-level `users/{uid}`)
///
/// `is_admin` mirrors the identity provider's admin claim; `projects` lists
/// the restaurant ids the account may operate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateValue>,
}

impl AccountRecord {
    pub fn can_access(&self, restaurant_id: &str) -> bool {
        self.is_admin || self.projects.iter().any(|p| p == restaurant_id)
    }
}
