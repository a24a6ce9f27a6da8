use std::sync::Arc;

use crate::{
    dto::food::{FoodForm, FoodResponse},
    error::ApiError,
    services::{file::FileStore, repository::FoodRepository},
};

/// Catalog operations tying food records to their image files
#[derive(Clone)]
pub struct FoodService {
    repository: Arc<dyn FoodRepository>,
    files: FileStore,
}

impl FoodService {
    pub fn new(repository: Arc<dyn FoodRepository>, files: FileStore) -> Self {
        Self { repository, files }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub async fn list(&self) -> Result<Vec<FoodResponse>, ApiError> {
        let foods = self
            .repository
            .list()
            .await
            .map_err(|e| ApiError::storage("Failed to retrieve food items", e))?;

        tracing::info!("Retrieved {} food items", foods.len());
        Ok(foods.into_iter().map(FoodResponse::from).collect())
    }

    /// Create a food item from an upload form and return its id.
    ///
    /// The image has already been written by the upload step; if the form is
    /// rejected or the insert fails, that file is discarded again.
    pub async fn add(&self, form: FoodForm) -> Result<String, ApiError> {
        let uploaded = form.image.clone();

        let result = match form.into_new_food() {
            Ok(food) => self
                .repository
                .insert(food)
                .await
                .map_err(|e| ApiError::storage("Failed to add food item", e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(item) => {
                tracing::info!("Created food item {} ({})", item.id_hex(), item.name);
                Ok(item.id_hex())
            }
            Err(e) => {
                if let Some(image) = uploaded {
                    self.files.discard_in_background(image);
                }
                Err(e)
            }
        }
    }

    pub async fn remove(&self, id: Option<String>) -> Result<(), ApiError> {
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::validation("Food ID is required"))?;

        let food = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(|e| ApiError::storage("Failed to delete food item", e))?
            .ok_or_else(ApiError::not_found)?;

        if !food.image.is_empty() {
            self.files.discard_in_background(food.image.clone());
        }

        let deleted = self
            .repository
            .delete(&id)
            .await
            .map_err(|e| ApiError::storage("Failed to delete food item", e))?;

        if !deleted {
            // lost a race with a concurrent remove
            return Err(ApiError::not_found());
        }

        tracing::info!("Deleted food item {} ({})", id, food.name);
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<FoodResponse, ApiError> {
        if id.is_empty() {
            return Err(ApiError::validation("Food ID is required"));
        }

        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::storage("Failed to retrieve food item", e))?
            .map(FoodResponse::from)
            .ok_or_else(ApiError::not_found)
    }

    pub async fn get_by_category(&self, category: &str) -> Result<Vec<FoodResponse>, ApiError> {
        if category.is_empty() {
            return Err(ApiError::validation("Category is required"));
        }

        let foods = self
            .repository
            .find_by_category(category)
            .await
            .map_err(|e| ApiError::storage("Failed to retrieve food items by category", e))?;

        Ok(foods.into_iter().map(FoodResponse::from).collect())
    }

    /// Merge `form` into the item; a new image replaces and discards the old one.
    pub async fn update(&self, id: &str, form: FoodForm) -> Result<FoodResponse, ApiError> {
        let uploaded = form.image.clone();

        let result = self.apply_update(id, form).await;
        if result.is_err() {
            if let Some(image) = uploaded {
                self.files.discard_in_background(image);
            }
        }
        result
    }

    async fn apply_update(&self, id: &str, form: FoodForm) -> Result<FoodResponse, ApiError> {
        if id.is_empty() {
            return Err(ApiError::validation("Food ID is required"));
        }

        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(|e| ApiError::storage("Failed to update food item", e))?
            .ok_or_else(ApiError::not_found)?;

        let patch = form.into_patch()?;

        let updated = self
            .repository
            .update(id, &patch)
            .await
            .map_err(|e| ApiError::storage("Failed to update food item", e))?
            .ok_or_else(ApiError::not_found)?;

        if let Some(new_image) = &patch.image {
            if !existing.image.is_empty() && existing.image != *new_image {
                self.files.discard_in_background(existing.image);
            }
        }

        tracing::info!("Updated food item {}", id);
        Ok(FoodResponse::from(updated))
    }
}
