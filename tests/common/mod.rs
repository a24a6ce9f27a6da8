#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use food_backend::{
    config::AppConfig,
    create_router,
    models::food::NewFood,
    services::{file::FileStore, memory::MemoryFoodRepository, repository::FoodRepository},
    AppState, FoodService,
};

pub const TEST_MAX_FILE_SIZE: usize = 1024;

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryFoodRepository>,
    pub files: FileStore,
    _upload_dir: TempDir,
}

pub fn test_config(upload_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "memory://".to_string();
    config.upload.dir = upload_dir.to_string_lossy().into_owned();
    config.upload.max_file_size = TEST_MAX_FILE_SIZE;
    config
}

pub fn setup_test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let repo = Arc::new(MemoryFoodRepository::new());
    let files = FileStore::new(upload_dir.path());
    let state = state_with(repo.clone(), &upload_dir);

    TestApp {
        router: create_router(state),
        repo,
        files,
        _upload_dir: upload_dir,
    }
}

/// App state over an arbitrary repository, for test doubles
pub fn state_with(repository: Arc<dyn FoodRepository>, upload_dir: &TempDir) -> AppState {
    let config = Arc::new(test_config(upload_dir.path()));
    let files = FileStore::new(upload_dir.path());
    AppState::new(FoodService::new(repository, files), config)
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }

    /// Insert a record directly, bypassing HTTP, with a real file behind it
    pub async fn seed(&self, name: &str, category: &str) -> (String, String) {
        let image = self.files.save("seed.png", b"seed").await.unwrap();
        let item = self
            .repo
            .insert(NewFood {
                name: name.to_string(),
                description: format!("{} description", name),
                price: 5.0,
                category: category.to_string(),
                image: image.clone(),
            })
            .await
            .unwrap();
        (item.id_hex(), image)
    }

    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(self.files.root())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Background deletes are not awaited by the request, so poll for them
    pub async fn wait_until_gone(&self, name: &str) -> bool {
        for _ in 0..100 {
            if !self.files.exists(name).await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Hand-built multipart/form-data body
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: "----food-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn image(self, file_name: &str) -> Self {
        self.file("image", file_name, "image/png", b"\x89PNG fake image bytes")
    }

    pub fn request(mut self, method: Method, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
