use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Other";

/// Menu entry as stored in the `foods` collection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FoodItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_category")]
    pub category: String,
    /// Filename of the image inside the upload directory
    pub image: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Validated input for creating a food item
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
}

/// Field-level changes for an existing food item; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl FoodItem {
    pub fn new(food: NewFood) -> Self {
        Self {
            id: None,
            name: food.name,
            description: food.description,
            price: food.price,
            category: food.category,
            image: food.image,
        }
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    /// Apply a patch in place
    pub fn apply(&mut self, patch: &FoodPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
    }
}

impl FoodPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }

    /// `$set` body containing only the supplied fields
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(name) = &self.name {
            set.insert("name", name);
        }
        if let Some(description) = &self.description {
            set.insert("description", description);
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(category) = &self.category {
            set.insert("category", category);
        }
        if let Some(image) = &self.image {
            set.insert("image", image);
        }
        set
    }
}
