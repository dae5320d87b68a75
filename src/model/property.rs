//! 房源记录模型
//! 包含存储文档、API请求体以及列表过滤条件

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 房源大类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Residential,
    Commercial,
    Land,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "Residential",
            PropertyType::Commercial => "Commercial",
            PropertyType::Land => "Land",
        }
    }
}

/// 交易类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Rent,
    Sale,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Rent => "Rent",
            TransactionType::Sale => "Sale",
        }
    }
}

/// 装修情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Furnishing {
    Furnished,
    #[serde(rename = "Semi-Furnished")]
    SemiFurnished,
    Unfurnished,
}

impl Furnishing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Furnishing::Furnished => "Furnished",
            Furnishing::SemiFurnished => "Semi-Furnished",
            Furnishing::Unfurnished => "Unfurnished",
        }
    }
}

/// 可抽取/可编辑的房源字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFields {
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    /// BHK规格或商业/土地子类型
    #[serde(default)]
    pub bhk: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<TransactionType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// 原始匹配文本，不做金额归一化
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub carpet_area: Option<String>,
    #[serde(default)]
    pub furnishing: Option<Furnishing>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// 新建房源请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    #[serde(flatten)]
    pub fields: PropertyFields,
    pub raw_message: String,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

/// 存储层中的房源文档（不含ID）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDocument {
    #[serde(flatten)]
    pub fields: PropertyFields,
    pub raw_message: String,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub image_size: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyDocument {
    pub fn from_new(new: NewProperty, now: DateTime<Utc>) -> Self {
        Self {
            fields: new.fields,
            raw_message: new.raw_message,
            confidence_score: new.confidence_score,
            is_favorite: false,
            tags: Vec::new(),
            image_id: None,
            image_filename: None,
            image_size: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 带ID的房源记录（API响应形态）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    #[serde(flatten)]
    pub document: PropertyDocument,
}

/// PUT 请求体：只合并出现的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bhk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carpet_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furnishing: Option<Furnishing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// 文档合并补丁
///
/// 语义与 JSON Merge Patch 一致：出现的键覆盖，`null` 删除键。
/// `updated_at` 由存储层在写入时补上。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch(Map<String, Value>);

impl PropertyPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_update(update: &PropertyUpdate) -> Self {
        match serde_json::to_value(update) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn favorite(is_favorite: bool) -> Self {
        Self::new().set("is_favorite", Value::Bool(is_favorite))
    }

    pub fn tags(tags: &[String]) -> Self {
        Self::new().set("tags", Value::from(tags.to_vec()))
    }

    pub fn attach_image(file_id: &str, filename: &str, size: u64) -> Self {
        Self::new()
            .set("image_id", Value::from(file_id))
            .set("image_filename", Value::from(filename))
            .set("image_size", Value::from(size))
    }

    pub fn clear_image() -> Self {
        Self::new()
            .set("image_id", Value::Null)
            .set("image_filename", Value::Null)
            .set("image_size", Value::Null)
    }

    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// 列表查询过滤条件（查询后在内存中过滤）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilter {
    pub property_type: Option<String>,
    pub transaction_type: Option<String>,
    pub bhk: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
}

impl PropertyFilter {
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        let fields = &record.document.fields;

        if let Some(expected) = non_empty(&self.property_type) {
            if fields.property_type.map(|t| t.as_str()) != Some(expected) {
                return false;
            }
        }

        if let Some(expected) = non_empty(&self.transaction_type) {
            if fields.transaction_type.map(|t| t.as_str()) != Some(expected) {
                return false;
            }
        }

        if let Some(expected) = non_empty(&self.bhk) {
            if fields.bhk.as_deref() != Some(expected) {
                return false;
            }
        }

        if let Some(location) = non_empty(&self.location) {
            let needle = location.to_lowercase();
            let haystack = fields.location.as_deref().unwrap_or("").to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }

        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            let in_message = record.document.raw_message.to_lowercase().contains(&needle);
            let in_contact = fields
                .contact_number
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&needle);
            if !in_message && !in_contact {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, records: Vec<PropertyRecord>) -> Vec<PropertyRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 标签去重，保留首次出现顺序
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
