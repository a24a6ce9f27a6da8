use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use utoipa::OpenApi;

use crate::{
    dto::food::{
        ErrorResponse, FoodCreatedResponse, FoodDetailResponse, FoodListResponse, FoodResponse,
        FoodUpdatedResponse, FoodUploadForm, MessageResponse, RemoveFoodRequest,
    },
    error::ApiError,
    middleware::upload::FoodUpload,
    AppState,
};

/// Food catalog API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        list_food,
        add_food,
        remove_food,
        get_food_by_id,
        get_foods_by_category,
        update_food
    ),
    components(
        schemas(
            FoodResponse, FoodListResponse, FoodDetailResponse, FoodCreatedResponse,
            FoodUpdatedResponse, MessageResponse, ErrorResponse, RemoveFoodRequest, FoodUploadForm
        )
    ),
    tags(
        (name = "food", description = "Menu catalog operations")
    ),
    info(
        title = "Food Delivery API",
        version = "1.0.0",
        description = "REST API for the food-ordering menu catalog"
    ),
    servers(
        (url = "http://localhost:4000", description = "Development server")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/api/food/list",
    tag = "food",
    responses(
        (status = 200, description = "All food items", body = FoodListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_food(State(state): State<AppState>) -> Result<Json<FoodListResponse>, ApiError> {
    let data = state.food_service.list().await?;
    Ok(Json(FoodListResponse { success: true, data }))
}

#[utoipa::path(
    post,
    path = "/api/food/add",
    tag = "food",
    request_body(content = FoodUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Food item created", body = FoodCreatedResponse),
        (status = 400, description = "Missing image, name or price, or rejected upload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn add_food(
    State(state): State<AppState>,
    FoodUpload(form): FoodUpload,
) -> Result<(StatusCode, Json<FoodCreatedResponse>), ApiError> {
    let food_id = state.food_service.add(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(FoodCreatedResponse {
            success: true,
            message: "Food item added successfully".to_string(),
            food_id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/food/remove",
    tag = "food",
    request_body = RemoveFoodRequest,
    responses(
        (status = 200, description = "Food item deleted", body = MessageResponse),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 404, description = "Food item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn remove_food(
    State(state): State<AppState>,
    payload: Result<Json<RemoveFoodRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    // a missing or unreadable body is the same as a missing id
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    state.food_service.remove(request.id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Food item deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/food/{id}",
    tag = "food",
    params(
        ("id" = String, Path, description = "Food item id")
    ),
    responses(
        (status = 200, description = "Food item", body = FoodDetailResponse),
        (status = 404, description = "Food item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_food_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FoodDetailResponse>, ApiError> {
    let data = state.food_service.get_by_id(&id).await?;
    Ok(Json(FoodDetailResponse { success: true, data }))
}

#[utoipa::path(
    get,
    path = "/api/food/category/{category}",
    tag = "food",
    params(
        ("category" = String, Path, description = "Exact, case-sensitive category name")
    ),
    responses(
        (status = 200, description = "Food items in the category, possibly none", body = FoodListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_foods_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<FoodListResponse>, ApiError> {
    let data = state.food_service.get_by_category(&category).await?;
    Ok(Json(FoodListResponse { success: true, data }))
}

#[utoipa::path(
    put,
    path = "/api/food/update/{id}",
    tag = "food",
    params(
        ("id" = String, Path, description = "Food item id")
    ),
    request_body(content = FoodUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Food item updated", body = FoodUpdatedResponse),
        (status = 400, description = "Invalid input or rejected upload", body = ErrorResponse),
        (status = 404, description = "Food item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FoodUpload(form): FoodUpload,
) -> Result<Json<FoodUpdatedResponse>, ApiError> {
    let data = state.food_service.update(&id, form).await?;
    Ok(Json(FoodUpdatedResponse {
        success: true,
        message: "Food item updated successfully".to_string(),
        data,
    }))
}
