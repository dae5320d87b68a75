use axum::extract::State;
use axum::Json;

use super::utils::scan_limit;
use crate::model::PropertyStats;
use crate::util::ServerError;
use crate::AppState;

/// 汇总统计，与列表接口使用同一读取上限
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<PropertyStats>, ServerError> {
    let records = state.database.list_properties(scan_limit(&state)).await?;
    Ok(Json(PropertyStats::from_records(&records)))
}

#[cfg(test)]
mod tests {
    use crate::api::routes;
    use crate::api::tests::{create_listing, empty_request, send, test_state, SAMPLE_MESSAGE};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_stats_counts_and_recent() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let (status, body) = send(&app, empty_request("GET", "/api/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_properties"], 0);
        assert_eq!(body["recent"], json!([]));

        let first = create_listing(
            &app,
            json!({
                "property_type": "Residential",
                "transaction_type": "Rent",
                "raw_message": SAMPLE_MESSAGE
            }),
        )
        .await;
        for i in 0..5 {
            create_listing(
                &app,
                json!({
                    "property_type": "Commercial",
                    "raw_message": format!("shop number {}", i)
                }),
            )
            .await;
        }
        send(
            &app,
            empty_request("PATCH", &format!("/api/properties/{}/favorite", first)),
        )
        .await;

        let (status, body) = send(&app, empty_request("GET", "/api/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_properties"], 6);
        assert_eq!(body["by_type"], json!({ "Commercial": 5, "Residential": 1 }));
        assert_eq!(body["by_transaction"], json!({ "Rent": 1, "Unknown": 5 }));
        assert_eq!(body["favorites"], 1);

        let recent = body["recent"].as_array().unwrap();
        assert_eq!(recent.len(), 5);
        assert!(recent.iter().all(|r| r["id"] != first.as_str()));
    }
}
