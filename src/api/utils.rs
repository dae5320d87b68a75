//! API 处理器共用的工具函数

use crate::model::PropertyRecord;
use crate::util::ServerError;
use crate::AppState;

pub const PROPERTY_NOT_FOUND: &str = "Property not found";

/// 读取房源，不存在（或ID格式非法）时返回 404
pub async fn load_property_or_404(state: &AppState, id: &str) -> Result<PropertyRecord, ServerError> {
    state
        .database
        .get_property(id)
        .await?
        .ok_or_else(|| ServerError::not_found(PROPERTY_NOT_FOUND))
}

/// 置信度必须位于 0-100
pub fn validate_confidence(score: Option<f64>) -> Result<(), ServerError> {
    match score {
        Some(value) if !(0.0..=100.0).contains(&value) => Err(ServerError::validation(format!(
            "confidence_score must be between 0 and 100, got {}",
            value
        ))),
        _ => Ok(()),
    }
}

/// 查重与统计读取的记录上限
pub fn scan_limit(state: &AppState) -> u32 {
    state.config.database.list_limit
}
