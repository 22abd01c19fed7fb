//! Collection addressing
//!
//! All per-restaurant data lives under `restaurants/{id}/{collection}`;
//! restaurants and login accounts are top-level collections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Restaurant (tenant) id, passed explicitly to every operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Collection names under a restaurant
pub mod names {
    pub const ORDERS: &str = "orders";
    pub const SETTLED_ORDERS: &str = "orderssuccess";
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "category";
    pub const ADDITIONS: &str = "additions";
    pub const DISCOUNTS: &str = "discounts";
    pub const CAROUSELS: &str = "carousels";
    pub const DELIVERY_SETTINGS: &str = "deliverySettings";
    pub const DELIVERY_USERS: &str = "deliveryUsers";
    pub const STAFF: &str = "users";

    pub const RESTAURANTS: &str = "restaurants";
    pub const ACCOUNTS: &str = "users";
}

/// Slash-separated collection path, e.g. `restaurants/r1/orders`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Top-level `restaurants`
    pub fn restaurants() -> Self {
        Self(names::RESTAURANTS.to_string())
    }

    /// Top-level `users` (login account records)
    pub fn accounts() -> Self {
        Self(names::ACCOUNTS.to_string())
    }

    /// `restaurants/{restaurant}/{collection}`
    pub fn scoped(restaurant: &RestaurantId, collection: &str) -> Self {
        Self(format!(
            "{}/{}/{}",
            names::RESTAURANTS,
            restaurant.as_str(),
            collection
        ))
    }

    pub fn orders(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::ORDERS)
    }

    pub fn settled_orders(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::SETTLED_ORDERS)
    }

    pub fn products(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::PRODUCTS)
    }

    pub fn categories(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::CATEGORIES)
    }

    pub fn additions(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::ADDITIONS)
    }

    pub fn discounts(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::DISCOUNTS)
    }

    pub fn carousels(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::CAROUSELS)
    }

    pub fn delivery_settings(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::DELIVERY_SETTINGS)
    }

    pub fn delivery_users(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::DELIVERY_USERS)
    }

    pub fn staff(restaurant: &RestaurantId) -> Self {
        Self::scoped(restaurant, names::STAFF)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
