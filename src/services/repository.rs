use anyhow::Result;
use async_trait::async_trait;

use crate::models::food::{FoodItem, FoodPatch, NewFood};

/// Storage seam for the food catalog
///
/// Ids are the hex form of the document id. An id that cannot name any
/// document (malformed) behaves like an unknown one: lookups return `None`.
#[async_trait]
pub trait FoodRepository: Send + Sync {
    /// All items in natural storage order
    async fn list(&self) -> Result<Vec<FoodItem>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<FoodItem>>;

    /// Exact, case-sensitive category match
    async fn find_by_category(&self, category: &str) -> Result<Vec<FoodItem>>;

    /// Persist a new item and return it with its assigned id
    async fn insert(&self, food: NewFood) -> Result<FoodItem>;

    /// Apply `patch` and return the updated item, or `None` if it no longer exists
    async fn update(&self, id: &str, patch: &FoodPatch) -> Result<Option<FoodItem>>;

    /// Returns whether a document was deleted
    async fn delete(&self, id: &str) -> Result<bool>;
}
