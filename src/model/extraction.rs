use serde::{Deserialize, Serialize};

use super::property::PropertyFields;

/// 抽取请求
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub message: String,
}

/// 单条消息的抽取结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(flatten)]
    pub fields: PropertyFields,
    pub raw_message: String,
    /// 0-100，两位小数
    pub confidence_score: f64,
}

/// 查重请求
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateCheckRequest {
    #[serde(default)]
    pub contact_number: Option<String>,
    pub raw_message: String,
}
