use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::utils::{load_property_or_404, scan_limit, validate_confidence, PROPERTY_NOT_FOUND};
use crate::model::{
    normalize_tags, NewProperty, PropertyFilter, PropertyPatch, PropertyRecord, PropertyUpdate,
};
use crate::util::logging::standards::events;
use crate::util::ServerError;
use crate::AppState;

/// 新建房源
pub async fn create_property(
    State(state): State<AppState>,
    Json(property): Json<NewProperty>,
) -> Result<Json<Value>, ServerError> {
    validate_confidence(property.confidence_score)?;

    let id = state.database.save_property(property).await?;
    info!(
        target: "server.http",
        event = events::PROPERTY_CREATED,
        property_id = %id,
    );

    Ok(Json(json!({
        "id": id,
        "message": "Property saved successfully",
    })))
}

/// 列表查询，过滤在读取后于内存中进行
pub async fn list_properties(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<PropertyRecord>>, ServerError> {
    let records = state.database.list_properties(scan_limit(&state)).await?;
    Ok(Json(filter.apply(records)))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyRecord>, ServerError> {
    load_property_or_404(&state, &id).await.map(Json)
}

/// 部分更新：只合并请求中出现的非空字段
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut update): Json<PropertyUpdate>,
) -> Result<Json<PropertyRecord>, ServerError> {
    validate_confidence(update.confidence_score)?;
    update.tags = update.tags.map(normalize_tags);

    let patch = PropertyPatch::from_update(&update);
    let matched = state.database.update_property(&id, &patch).await?;
    if matched == 0 {
        return Err(ServerError::not_found(PROPERTY_NOT_FOUND));
    }

    info!(
        target: "server.http",
        event = events::PROPERTY_UPDATED,
        property_id = %id,
        fields = ?update_keys(&patch),
    );

    load_property_or_404(&state, &id).await.map(Json)
}

/// 删除房源并尽力清理其图片
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let record = load_property_or_404(&state, &id).await?;

    let deleted = state.database.delete_property(&id).await?;
    if deleted == 0 {
        return Err(ServerError::not_found(PROPERTY_NOT_FOUND));
    }

    if let Some(image_id) = record.document.image_id.as_deref() {
        state
            .images
            .delete(image_id, record.document.image_filename.as_deref())
            .await;
    }

    info!(
        target: "server.http",
        event = events::PROPERTY_DELETED,
        property_id = %id,
    );

    Ok(Json(json!({ "message": "Property deleted successfully" })))
}

/// 切换收藏状态
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let record = load_property_or_404(&state, &id).await?;
    let is_favorite = !record.document.is_favorite;

    let matched = state
        .database
        .update_property(&id, &PropertyPatch::favorite(is_favorite))
        .await?;
    if matched == 0 {
        return Err(ServerError::not_found(PROPERTY_NOT_FOUND));
    }

    Ok(Json(json!({
        "message": "Favorite status updated",
        "is_favorite": is_favorite,
    })))
}

/// 整体替换标签
pub async fn update_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(tags): Json<Vec<String>>,
) -> Result<Json<Value>, ServerError> {
    let tags = normalize_tags(tags);

    let matched = state
        .database
        .update_property(&id, &PropertyPatch::tags(&tags))
        .await?;
    if matched == 0 {
        return Err(ServerError::not_found(PROPERTY_NOT_FOUND));
    }

    Ok(Json(json!({
        "message": "Tags updated",
        "tags": tags,
    })))
}

fn update_keys(patch: &PropertyPatch) -> Vec<String> {
    match patch.clone().into_value() {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::routes;
    use crate::api::tests::{
        create_listing, empty_request, json_request, send, test_state, SAMPLE_MESSAGE,
    };
    use axum::http::StatusCode;
    use chrono::DateTime;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_then_get_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/properties",
                json!({
                    "property_type": "Residential",
                    "bhk": "2BHK",
                    "transaction_type": "Rent",
                    "location": "Borivali",
                    "furnishing": "Semi-Furnished",
                    "contact_number": "9876543210",
                    "raw_message": SAMPLE_MESSAGE,
                    "confidence_score": 87.5
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Property saved successfully");
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, empty_request("GET", &format!("/api/properties/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["property_type"], "Residential");
        assert_eq!(body["furnishing"], "Semi-Furnished");
        assert_eq!(body["raw_message"], SAMPLE_MESSAGE);
        assert_eq!(body["confidence_score"], 87.5);
        assert_eq!(body["is_favorite"], false);
        assert_eq!(body["tags"], json!([]));
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/properties",
                json!({ "raw_message": "x", "confidence_score": 120.0 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("confidence_score"));

        let (status, _) = send(
            &app,
            json_request("POST", "/api/properties", json!({ "location": "Dadar" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        for uri in [
            "/api/properties/not-an-id",
            "/api/properties/0123456789abcdef0123456789abcdef",
        ] {
            let (status, body) = send(&app, empty_request("GET", uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["detail"], "Property not found");
        }

        let (status, _) = send(
            &app,
            json_request("PUT", "/api/properties/not-an-id", json!({ "price": "1 cr" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, empty_request("DELETE", "/api/properties/not-an-id")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            empty_request("PATCH", "/api/properties/not-an-id/favorite"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            json_request("PATCH", "/api/properties/not-an-id/tags", json!(["hot"])),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_subset_leaves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);
        let id = create_listing(
            &app,
            json!({
                "location": "Borivali",
                "price": "35000",
                "contact_number": "9876543210",
                "raw_message": SAMPLE_MESSAGE
            }),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/properties/{}", id),
                json!({ "price": "40000", "notes": null, "tags": ["hot", "hot", "sea view"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], "40000");
        assert_eq!(body["location"], "Borivali");
        assert_eq!(body["contact_number"], "9876543210");
        assert_eq!(body["raw_message"], SAMPLE_MESSAGE);
        assert_eq!(body["tags"], json!(["hot", "sea view"]));
        let created = DateTime::parse_from_rfc3339(body["created_at"].as_str().unwrap()).unwrap();
        let updated = DateTime::parse_from_rfc3339(body["updated_at"].as_str().unwrap()).unwrap();
        assert!(updated >= created);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);
        create_listing(
            &app,
            json!({
                "property_type": "Residential",
                "transaction_type": "Rent",
                "bhk": "2BHK",
                "location": "Borivali",
                "contact_number": "9876543210",
                "raw_message": SAMPLE_MESSAGE
            }),
        )
        .await;
        create_listing(
            &app,
            json!({
                "property_type": "Commercial",
                "transaction_type": "Sale",
                "bhk": "Shop",
                "location": "Dadar",
                "raw_message": "Shop for sale at Dadar"
            }),
        )
        .await;

        let (status, body) = send(&app, empty_request("GET", "/api/properties")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(
            &app,
            empty_request("GET", "/api/properties?property_type=Commercial"),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["location"], "Dadar");

        let (_, body) = send(&app, empty_request("GET", "/api/properties?location=bori")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["bhk"], "2BHK");

        let (_, body) = send(&app, empty_request("GET", "/api/properties?search=98765")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(
            &app,
            empty_request("GET", "/api/properties?transaction_type=Rent&bhk=Shop"),
        )
        .await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);
        let id = create_listing(&app, json!({ "raw_message": SAMPLE_MESSAGE })).await;
        let uri = format!("/api/properties/{}/favorite", id);

        let (status, body) = send(&app, empty_request("PATCH", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Favorite status updated");
        assert_eq!(body["is_favorite"], true);

        let (_, body) = send(&app, empty_request("PATCH", &uri)).await;
        assert_eq!(body["is_favorite"], false);
    }

    #[tokio::test]
    async fn test_tags_are_replaced_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);
        let id = create_listing(&app, json!({ "raw_message": SAMPLE_MESSAGE })).await;
        let uri = format!("/api/properties/{}/tags", id);

        let (status, body) = send(
            &app,
            json_request("PATCH", &uri, json!(["urgent", "sea view", "urgent"])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Tags updated");
        assert_eq!(body["tags"], json!(["urgent", "sea view"]));

        send(&app, json_request("PATCH", &uri, json!(["resale"]))).await;
        let (_, body) = send(&app, empty_request("GET", &format!("/api/properties/{}", id))).await;
        assert_eq!(body["tags"], json!(["resale"]));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);
        let id = create_listing(&app, json!({ "raw_message": SAMPLE_MESSAGE })).await;
        let uri = format!("/api/properties/{}", id);

        let (status, body) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Property deleted successfully");

        let (status, _) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
