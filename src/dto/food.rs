use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    models::food::{FoodItem, FoodPatch, NewFood, DEFAULT_CATEGORY},
};

/// Food item as returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FoodResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
}

impl From<FoodItem> for FoodResponse {
    fn from(food: FoodItem) -> Self {
        Self {
            id: food.id_hex(),
            name: food.name,
            description: food.description,
            price: food.price,
            category: food.category,
            image: food.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodListResponse {
    pub success: bool,
    pub data: Vec<FoodResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodDetailResponse {
    pub success: bool,
    pub data: FoodResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodCreatedResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "foodId")]
    pub food_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub data: FoodResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String, error: Option<String>) -> Self {
        Self {
            success: false,
            message,
            error,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RemoveFoodRequest {
    pub id: Option<String>,
}

/// Raw add/update input, as text fields plus the stored image name
///
/// Values arrive untyped from multipart or JSON bodies; `into_new_food` and
/// `into_patch` turn them into validated commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Multipart body accepted by `POST /add` and `PUT /update/{id}`
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct FoodUploadForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_price(raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| ApiError::validation(format!("Price must be a number, got {:?}", raw)))
}

impl FoodForm {
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "price" => self.price = Some(value),
            "category" => self.category = Some(value),
            _ => tracing::debug!("Ignoring unknown form field: {}", field),
        }
    }

    pub fn into_new_food(self) -> Result<NewFood, ApiError> {
        let image = self
            .image
            .ok_or_else(|| ApiError::validation("Image file is required"))?;

        let (name, price) = match (present(self.name), present(self.price)) {
            (Some(name), Some(price)) => (name, price),
            _ => return Err(ApiError::validation("Name and price are required fields")),
        };

        Ok(NewFood {
            name,
            description: self.description.unwrap_or_default(),
            price: parse_price(&price)?,
            category: present(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image,
        })
    }

    /// Empty `name`/`price`/`category` are treated as absent; `description`
    /// is applied whenever it was sent, including the empty string.
    pub fn into_patch(self) -> Result<FoodPatch, ApiError> {
        let price = match present(self.price) {
            Some(raw) => Some(parse_price(&raw)?),
            None => None,
        };

        Ok(FoodPatch {
            name: present(self.name),
            description: self.description,
            price,
            category: present(self.category),
            image: self.image,
        })
    }
}
