use anyhow::Result;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument},
    Client, Collection, Database as MongoDatabase,
};
use tracing::info;

use crate::{
    models::food::{FoodItem, FoodPatch, NewFood},
    services::repository::FoodRepository,
};

/// Database connection wrapper for MongoDB
///
/// Owned by `main` and handed to the repositories that need it.
#[derive(Clone)]
pub struct Database {
    /// MongoDB client instance for connection management
    pub client: Client,
    /// Specific database instance for this application
    pub database: MongoDatabase,
}

impl Database {
    /// Create a new database connection to MongoDB
    ///
    /// Parses the connection URL, tags the client with an application name
    /// and lists databases once so a bad URL fails at startup rather than on
    /// the first request.
    ///
    /// # Example
    /// ```no_run
    /// # async fn run() -> Result<(), mongodb::error::Error> {
    /// let db = food_backend::services::database::Database::new("mongodb://localhost:27017", "food_del").await?;
    /// # Ok(()) }
    /// ```
    pub async fn new(database_url: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        info!("Connecting to MongoDB: {}", database_url);

        let mut client_options = ClientOptions::parse(database_url).await?;
        client_options.app_name = Some("food-del-backend".to_string());

        let client = Client::with_options(client_options)?;
        let database = client.database(db_name);

        client.list_database_names(None, None).await?;

        info!("MongoDB connection established successfully");

        Ok(Self { client, database })
    }
}

/// Food catalog stored in a MongoDB collection
#[derive(Clone)]
pub struct MongoFoodRepository {
    collection: Collection<FoodItem>,
}

impl MongoFoodRepository {
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.database.collection(collection),
        }
    }
}

fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[async_trait]
impl FoodRepository for MongoFoodRepository {
    async fn list(&self) -> Result<Vec<FoodItem>> {
        let cursor = self.collection.find(None, None).await?;
        let foods: Vec<FoodItem> = cursor.try_collect().await?;
        tracing::debug!("Retrieved {} food items", foods.len());
        Ok(foods)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<FoodItem>> {
        let Some(object_id) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.collection.find_one(doc! {"_id": object_id}, None).await?)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<FoodItem>> {
        let cursor = self
            .collection
            .find(doc! {"category": category}, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, food: NewFood) -> Result<FoodItem> {
        let mut item = FoodItem::new(food);
        let result = self.collection.insert_one(&item, None).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow::anyhow!("Inserted document has no ObjectId"))?;
        item.id = Some(id);
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &FoodPatch) -> Result<Option<FoodItem>> {
        let Some(object_id) = parse_id(id) else {
            return Ok(None);
        };
        let filter = doc! {"_id": object_id};

        if patch.is_empty() {
            return Ok(self.collection.find_one(filter, None).await?);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(filter, doc! {"$set": patch.to_set_document()}, options)
            .await?)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(object_id) = parse_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! {"_id": object_id}, None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}
