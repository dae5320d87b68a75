use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use super::utils::load_property_or_404;
use crate::model::PropertyPatch;
use crate::util::logging::standards::events;
use crate::util::ServerError;
use crate::AppState;

const FILE_FIELD: &str = "file";
const DEFAULT_FILENAME: &str = "upload.jpg";

/// 上传房源图片（multipart 字段 `file`），同时生成缩略图
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, ServerError> {
    let record = load_property_or_404(&state, &id).await?;
    let (filename, bytes) = read_file_field(multipart).await?;

    if let Err(e) = state.images.validate(&bytes) {
        warn!(
            target: "image",
            event = events::IMAGE_REJECTED,
            property_id = %id,
            bytes = bytes.len(),
            reason = %e,
        );
        return Err(e.into());
    }

    let saved = state
        .images
        .save(&bytes, &filename)
        .await
        .map_err(|e| ServerError::Internal(format!("Upload failed: {:#}", e)))?;

    state
        .database
        .update_property(
            &id,
            &PropertyPatch::attach_image(&saved.file_id, &saved.filename, saved.size),
        )
        .await?;

    // 替换旧图时清理旧文件
    if let Some(previous) = record.document.image_id.as_deref() {
        if previous != saved.file_id {
            state
                .images
                .delete(previous, record.document.image_filename.as_deref())
                .await;
        }
    }

    Ok(Json(json!({
        "success": true,
        "file_id": saved.file_id,
        "filename": saved.filename,
        "image_url": state.images.image_url(&saved.file_id, Some(&saved.filename)),
        "thumbnail_url": state.images.thumbnail_url(&saved.file_id),
    })))
}

/// 读取房源图片，原图与缩略图以 data URI 返回
pub async fn get_property_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let record = load_property_or_404(&state, &id).await?;
    let Some(file_id) = record.document.image_id.as_deref() else {
        return Ok(Json(json!({ "has_image": false, "images": [] })));
    };

    let image = state.images.fetch_base64(file_id, false).await?;
    let thumbnail = state.images.fetch_base64(file_id, true).await?;
    let filename = record.document.image_filename.as_deref();

    Ok(Json(json!({
        "has_image": true,
        "file_id": file_id,
        "filename": filename,
        "image_base64": image.map(|i| i.data_uri()),
        "thumbnail_base64": thumbnail.map(|i| i.data_uri()),
        "image_url": state.images.image_url(file_id, filename),
        "thumbnail_url": state.images.thumbnail_url(file_id),
    })))
}

/// 删除房源图片并清空引用
pub async fn delete_property_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let record = load_property_or_404(&state, &id).await?;
    let Some(file_id) = record.document.image_id.as_deref() else {
        return Err(ServerError::not_found("No image found for this property"));
    };

    state
        .images
        .delete(file_id, record.document.image_filename.as_deref())
        .await;
    state
        .database
        .update_property(&id, &PropertyPatch::clear_image())
        .await?;

    Ok(Json(json!({ "message": "Image deleted successfully" })))
}

async fn read_file_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::validation(format!("Failed to read upload: {}", e)))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ServerError::validation("No file uploaded"))
}
