//! Restaurant (tenant) directory

use crate::orders::{OrderError, OrderResult};
use crate::store::{Collection, CollectionPath, CollectionStore, Fields, Subscription};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use serde_json::Value;
use shared::models::Restaurant;
use shared::order::DateValue;
use std::sync::Arc;

/// Top-level `restaurants` collection
#[derive(Clone)]
pub struct RestaurantDirectory {
    restaurants: Collection<Restaurant>,
}

impl RestaurantDirectory {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            restaurants: Collection::new(store, CollectionPath::restaurants()),
        }
    }

    pub async fn list(&self) -> OrderResult<Vec<Restaurant>> {
        Ok(self.restaurants.list().await?)
    }

    pub async fn get(&self, id: &str) -> OrderResult<Restaurant> {
        self.restaurants
            .get(id)
            .await?
            .ok_or_else(|| OrderError::RestaurantNotFound(id.to_string()))
    }

    /// Register a restaurant, stamped with the creation time
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        image: &str,
    ) -> OrderResult<Restaurant> {
        validate_required_text(name, "name", MAX_NAME_LEN)?;

        let mut restaurant = Restaurant {
            id: None,
            name: name.trim().to_string(),
            description: Some(description.to_string()),
            image: Some(image.to_string()),
            created_at: Some(DateValue::now()),
        };
        let id = self.restaurants.create(&restaurant).await?;
        tracing::info!(restaurant = %id, "Restaurant created");
        restaurant.id = Some(id);

        Ok(restaurant)
    }

    /// Overwrite name, description and image; `createdAt` is kept
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: &str,
        image: &str,
    ) -> OrderResult<()> {
        validate_required_text(name, "name", MAX_NAME_LEN)?;

        let mut partial = Fields::new();
        partial.insert("name".to_string(), Value::from(name.trim()));
        partial.insert("description".to_string(), Value::from(description));
        partial.insert("image".to_string(), Value::from(image));
        self.restaurants.update(id, partial).await?;

        tracing::info!(restaurant = %id, "Restaurant updated");
        Ok(())
    }

    /// Remove the restaurant document
    ///
    /// Its sub-collections are left in place.
    pub async fn delete(&self, id: &str) -> OrderResult<()> {
        self.restaurants.delete(id).await?;
        tracing::info!(restaurant = %id, "Restaurant deleted");
        Ok(())
    }

    pub async fn subscribe(&self) -> OrderResult<Subscription> {
        Ok(self.restaurants.subscribe().await?)
    }
}
