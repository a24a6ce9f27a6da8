use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Json, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;

use crate::{dto::food::FoodForm, error::ApiError, services::file::FileStore, AppState};

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Text fields plus the stored image of an add/update request.
///
/// Runs ahead of the handler: the image, if any, is type- and size-checked
/// and written to the file store before the handler sees the form. A
/// rejected upload short-circuits with a 400 and nothing is persisted.
/// Requests that are not multipart are read as JSON objects (or as an empty
/// form) so JSON-only updates keep working.
#[derive(Debug)]
pub struct FoodUpload(pub FoodForm);

#[async_trait]
impl FromRequest<AppState> for FoodUpload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                ApiError::UploadRejected(format!("Upload error: {}", e.body_text()))
            })?;
            let form = read_multipart(
                multipart,
                state.food_service.files(),
                state.config.upload.max_file_size,
            )
            .await?;
            Ok(Self(form))
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?;
            Ok(Self(form_from_json(body)))
        } else {
            Ok(Self(FoodForm::default()))
        }
    }
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::UploadRejected(format!("Upload error: {}", err.body_text()))
}

/// Read every part, accept at most one image under [`IMAGE_FIELD`], then store it.
pub async fn read_multipart(
    mut multipart: Multipart,
    files: &FileStore,
    max_file_size: usize,
) -> Result<FoodForm, ApiError> {
    let mut form = FoodForm::default();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or("").to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(upload_error)?;
            form.set(&name, value);
            continue;
        };

        // browsers send an empty file part when nothing was picked
        if file_name.is_empty() && name == IMAGE_FIELD {
            while field.chunk().await.map_err(upload_error)?.is_some() {}
            continue;
        }

        if name != IMAGE_FIELD || image.is_some() {
            return Err(ApiError::UploadRejected(
                "Upload error: Unexpected field".to_string(),
            ));
        }

        let is_image = field
            .content_type()
            .map(|ct| ct.to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            tracing::warn!("Rejected upload {}: not an image", file_name);
            return Err(ApiError::UploadRejected(
                "Only image files are allowed".to_string(),
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(upload_error)? {
            if data.len() + chunk.len() > max_file_size {
                tracing::warn!("Rejected upload {}: over {} bytes", file_name, max_file_size);
                return Err(ApiError::UploadRejected(
                    "Upload error: File too large".to_string(),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        image = Some((file_name, data));
    }

    if let Some((file_name, data)) = image {
        let stored = files
            .save(&file_name, &data)
            .await
            .map_err(|e| ApiError::storage("Failed to store uploaded image", e))?;
        form.image = Some(stored);
    }

    Ok(form)
}

/// `0`, `false`, `""` and `null` do not count as a value.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Falsy values leave `name`, `price` and `category` untouched; `description`
/// takes any explicit non-null value. `null` counts as absent everywhere.
fn form_from_json(body: Value) -> FoodForm {
    let mut form = FoodForm::default();
    let Value::Object(fields) = body else {
        return form;
    };

    for (key, value) in fields {
        if value.is_null() || (key != "description" && is_falsy(&value)) {
            continue;
        }
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        form.set(&key, text);
    }
    form
}
