//! Catalog bindings
//!
//! Menu, promotion, delivery and staff collections are plain CRUD: each is a
//! [`Collection`] bound under `restaurants/{id}/`. Restaurants themselves
//! live in the top-level `restaurants` collection ([`RestaurantDirectory`]).

mod restaurants;

pub use restaurants::RestaurantDirectory;

use crate::store::{Collection, CollectionPath, CollectionStore, RestaurantId};
use shared::models::{
    Addition, Carousel, Category, DeliverySettings, DeliveryUser, Discount, Product, StaffMember,
};
use std::sync::Arc;

/// Typed collections of one restaurant
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CollectionStore>,
    restaurant: RestaurantId,
}

impl Catalog {
    pub fn new(store: Arc<dyn CollectionStore>, restaurant: RestaurantId) -> Self {
        Self { store, restaurant }
    }

    pub fn restaurant(&self) -> &RestaurantId {
        &self.restaurant
    }

    fn bind<T>(&self, path: CollectionPath) -> Collection<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        Collection::new(self.store.clone(), path)
    }

    pub fn products(&self) -> Collection<Product> {
        self.bind(CollectionPath::products(&self.restaurant))
    }

    pub fn categories(&self) -> Collection<Category> {
        self.bind(CollectionPath::categories(&self.restaurant))
    }

    pub fn additions(&self) -> Collection<Addition> {
        self.bind(CollectionPath::additions(&self.restaurant))
    }

    pub fn discounts(&self) -> Collection<Discount> {
        self.bind(CollectionPath::discounts(&self.restaurant))
    }

    pub fn carousels(&self) -> Collection<Carousel> {
        self.bind(CollectionPath::carousels(&self.restaurant))
    }

    pub fn delivery_settings(&self) -> Collection<DeliverySettings> {
        self.bind(CollectionPath::delivery_settings(&self.restaurant))
    }

    pub fn delivery_users(&self) -> Collection<DeliveryUser> {
        self.bind(CollectionPath::delivery_users(&self.restaurant))
    }

    /// Per-restaurant staff directory (`restaurants/{id}/users`)
    pub fn staff(&self) -> Collection<StaffMember> {
        self.bind(CollectionPath::staff(&self.restaurant))
    }
}
