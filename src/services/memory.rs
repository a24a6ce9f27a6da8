use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    models::food::{FoodItem, FoodPatch, NewFood},
    services::repository::FoodRepository,
};

/// Process-local catalog, selected with a `memory://` database url
///
/// Keeps insertion order so `list` mirrors a collection's natural order.
#[derive(Default)]
pub struct MemoryFoodRepository {
    foods: RwLock<Vec<FoodItem>>,
}

impl MemoryFoodRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.foods.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.foods.read().await.is_empty()
    }
}

fn matches(food: &FoodItem, id: &str) -> bool {
    food.id.map(|oid| oid.to_hex() == id).unwrap_or(false)
}

#[async_trait]
impl FoodRepository for MemoryFoodRepository {
    async fn list(&self) -> Result<Vec<FoodItem>> {
        Ok(self.foods.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FoodItem>> {
        let foods = self.foods.read().await;
        Ok(foods.iter().find(|food| matches(food, id)).cloned())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<FoodItem>> {
        let foods = self.foods.read().await;
        Ok(foods
            .iter()
            .filter(|food| food.category == category)
            .cloned()
            .collect())
    }

    async fn insert(&self, food: NewFood) -> Result<FoodItem> {
        let mut item = FoodItem::new(food);
        item.id = Some(ObjectId::new());
        self.foods.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &FoodPatch) -> Result<Option<FoodItem>> {
        let mut foods = self.foods.write().await;
        Ok(foods.iter_mut().find(|food| matches(food, id)).map(|food| {
            food.apply(patch);
            food.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut foods = self.foods.write().await;
        let before = foods.len();
        foods.retain(|food| !matches(food, id));
        Ok(foods.len() < before)
    }
}
