pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use error::ApiError;
pub use services::food::FoodService;

use crate::handlers::food::{self, ApiDoc};

/// Room for the text fields and multipart framing around the image itself
const UPLOAD_BODY_HEADROOM: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    /// Catalog operations over the injected repository and file store
    pub food_service: FoodService,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(food_service: FoodService, config: Arc<AppConfig>) -> Self {
        Self {
            food_service,
            config,
        }
    }
}

/// Catalog routes, relative to their `/api/food` mount point
pub fn food_router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/list", get(food::list_food))
        .route("/add", post(food::add_food))
        .route("/remove", delete(food::remove_food))
        .route("/:id", get(food::get_food_by_id))
        .route("/category/:category", get(food::get_foods_by_category))
        .route("/update/:id", put(food::update_food))
        .layer(DefaultBodyLimit::max(max_file_size + UPLOAD_BODY_HEADROOM))
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();
    let upload = &config.upload;

    // Uploaded images, read-only, keyed by the name stored on the food item
    let image_routes = Router::new().nest_service(
        &upload.public_path,
        ServeDir::new(state.food_service.files().root()),
    );

    let api_docs_routes = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest("/api/food", food_router(upload.max_file_size))
        .merge(image_routes)
        .merge(api_docs_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
