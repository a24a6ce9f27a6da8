mod common;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use food_backend::{
    create_router,
    models::food::{FoodItem, FoodPatch, NewFood},
    services::repository::FoodRepository,
};
use common::{get, json_request, send, state_with, MultipartBuilder};

/// Repository whose backing store is unreachable
struct UnavailableRepository;

#[async_trait]
impl FoodRepository for UnavailableRepository {
    async fn list(&self) -> Result<Vec<FoodItem>> {
        Err(anyhow!("connection refused"))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<FoodItem>> {
        Err(anyhow!("connection refused"))
    }

    async fn find_by_category(&self, _category: &str) -> Result<Vec<FoodItem>> {
        Err(anyhow!("connection refused"))
    }

    async fn insert(&self, _food: NewFood) -> Result<FoodItem> {
        Err(anyhow!("connection refused"))
    }

    async fn update(&self, _id: &str, _patch: &FoodPatch) -> Result<Option<FoodItem>> {
        Err(anyhow!("connection refused"))
    }

    async fn delete(&self, _id: &str) -> Result<bool> {
        Err(anyhow!("connection refused"))
    }
}

#[tokio::test]
async fn test_storage_failures_map_to_500() {
    let upload_dir = tempfile::tempdir().unwrap();
    let router = create_router(state_with(Arc::new(UnavailableRepository), &upload_dir));

    let unknown = "65f1c0ffee0000000000beef";
    let cases = vec![
        (get("/api/food/list"), "Failed to retrieve food items"),
        (get("/api/food/65f1c0ffee0000000000beef"), "Failed to retrieve food item"),
        (get("/api/food/category/Salad"), "Failed to retrieve food items by category"),
        (
            json_request(Method::DELETE, "/api/food/remove", json!({"id": unknown})),
            "Failed to delete food item",
        ),
        (
            json_request(
                Method::PUT,
                &format!("/api/food/update/{}", unknown),
                json!({"name": "x"}),
            ),
            "Failed to update food item",
        ),
    ];

    for (request, message) in cases {
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
        assert_eq!(body["error"], "connection refused");
    }
}

#[tokio::test]
async fn test_failed_insert_reports_500_and_discards_upload() {
    let upload_dir = tempfile::tempdir().unwrap();
    let router = create_router(state_with(Arc::new(UnavailableRepository), &upload_dir));

    let request = MultipartBuilder::new()
        .text("name", "Pizza")
        .text("price", "9.99")
        .image("a.png")
        .request(Method::POST, "/api/food/add");
    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to add food item");
    assert_eq!(body["error"], "connection refused");

    let mut empty = false;
    for _ in 0..100 {
        if std::fs::read_dir(upload_dir.path()).unwrap().next().is_none() {
            empty = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(empty, "upload was not discarded");
}

#[tokio::test]
async fn test_validation_runs_before_storage() {
    let upload_dir = tempfile::tempdir().unwrap();
    let router = create_router(state_with(Arc::new(UnavailableRepository), &upload_dir));

    let (status, body) = send(
        &router,
        json_request(Method::DELETE, "/api/food/remove", json!({"id": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Food ID is required");
}
