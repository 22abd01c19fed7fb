//! Carousel Model

use serde::{Deserialize, Serialize};

/// Featured-products carousel (`carousels` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// Display position (ascending)
    #[serde(default = "default_order")]
    pub order: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

fn default_order() -> i32 {
    1
}
