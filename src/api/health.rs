use axum::Json;
use serde_json::{json, Value};

use crate::build_info;

/// 服务根路径
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Real Estate AI API",
        "version": build_info::version(),
        "status": "running",
    }))
}

/// 存活探针，不访问存储
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
