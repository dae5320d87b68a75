use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::utils::scan_limit;
use crate::model::{DuplicateCheckRequest, ExtractRequest, ExtractionResult};
use crate::util::extract::{detect_duplicate, extract_property_details};
use crate::util::logging::standards::events;
use crate::util::ServerError;
use crate::AppState;

/// 从消息中抽取房源字段（不落库）
pub async fn extract(Json(request): Json<ExtractRequest>) -> Json<ExtractionResult> {
    Json(extract_property_details(&request.message))
}

/// 与已保存的房源比对，返回第一条疑似重复记录
pub async fn check_duplicate(
    State(state): State<AppState>,
    Json(request): Json<DuplicateCheckRequest>,
) -> Result<Json<Value>, ServerError> {
    let existing = state.database.list_properties(scan_limit(&state)).await?;
    let duplicate = detect_duplicate(
        request.contact_number.as_deref(),
        &request.raw_message,
        &existing,
    );

    if let Some(record) = duplicate {
        info!(
            target: "extract",
            event = events::DUPLICATE_FOUND,
            property_id = %record.id,
        );
    }

    Ok(Json(json!({
        "is_duplicate": duplicate.is_some(),
        "duplicate": duplicate,
    })))
}

#[cfg(test)]
mod tests {
    use crate::api::routes;
    use crate::api::tests::{create_listing, json_request, send, test_state, SAMPLE_MESSAGE};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_extract_sample_message() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/extract", json!({ "message": SAMPLE_MESSAGE })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["property_type"], "Residential");
        assert_eq!(body["bhk"], "2BHK");
        assert_eq!(body["transaction_type"], "Rent");
        assert_eq!(body["location"], "Borivali");
        assert_eq!(body["region"], "Western");
        assert_eq!(body["carpet_area"], "850 sqft");
        assert_eq!(body["furnishing"], "Semi-Furnished");
        assert_eq!(body["contact_number"], "9876543210");
        assert_eq!(body["raw_message"], SAMPLE_MESSAGE);
        assert_eq!(body["confidence_score"], 87.5);
    }

    #[tokio::test]
    async fn test_extract_requires_message() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let (status, _) = send(&app, json_request("POST", "/api/extract", json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_check_duplicate_against_saved_listing() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);
        let id = create_listing(
            &app,
            json!({ "raw_message": SAMPLE_MESSAGE, "contact_number": "9876543210" }),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/check-duplicate",
                json!({ "contact_number": "9876543210", "raw_message": SAMPLE_MESSAGE }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_duplicate"], true);
        assert_eq!(body["duplicate"]["id"], id.as_str());

        let (_, body) = send(
            &app,
            json_request(
                "POST",
                "/api/check-duplicate",
                json!({ "contact_number": "9876543210", "raw_message": "shop for sale in Dadar" }),
            ),
        )
        .await;
        assert_eq!(body["is_duplicate"], false);
        assert!(body["duplicate"].is_null());

        let (_, body) = send(
            &app,
            json_request(
                "POST",
                "/api/check-duplicate",
                json!({ "raw_message": SAMPLE_MESSAGE }),
            ),
        )
        .await;
        assert_eq!(body["is_duplicate"], false);
    }
}
