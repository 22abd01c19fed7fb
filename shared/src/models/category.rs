//! Category Model

use serde::{Deserialize, Serialize};

/// Menu category (`category` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Storefront route slug
    #[serde(default)]
    pub route: String,
    /// Background colour (CSS value)
    #[serde(default)]
    pub colorbg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}
