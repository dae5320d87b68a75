use anyhow::Result;
use async_trait::async_trait;

use crate::model::{NewProperty, PropertyPatch, PropertyRecord};

/// 房源库错误
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// 启动时未能连接到存储，所有操作都将失败
    #[error("property store unavailable: {0}")]
    Unavailable(String),
}

/// 房源文档库抽象
#[async_trait]
pub trait Database: Send + Sync {
    /// 保存新房源，返回生成的ID
    async fn save_property(&self, property: NewProperty) -> Result<String>;

    /// 按ID读取；ID格式非法时返回 None
    async fn get_property(&self, id: &str) -> Result<Option<PropertyRecord>>;

    /// 按写入顺序列出，最多 `limit` 条
    async fn list_properties(&self, limit: u32) -> Result<Vec<PropertyRecord>>;

    /// 合并补丁并更新 updated_at，返回命中的记录数
    async fn update_property(&self, id: &str, patch: &PropertyPatch) -> Result<u64>;

    /// 删除房源，返回删除的记录数
    async fn delete_property(&self, id: &str) -> Result<u64>;

    /// 健康检查
    async fn health_check(&self) -> Result<bool>;

    /// 初始化表结构
    async fn initialize(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
