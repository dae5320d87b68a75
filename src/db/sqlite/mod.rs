//! SQLite模块
//! 房源以 JSON 文档形式存放在 `properties` 表中

pub mod connection;
pub mod queries;
pub mod schemas;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::time::Duration;
use uuid::Uuid;

use super::traits::Database;
use crate::model::{NewProperty, PropertyDocument, PropertyPatch, PropertyRecord};
use connection::ConnectionManager;
use queries::{HealthQueries, PropertyQueries};
use schemas::SchemaManager;

/// SQLite数据库实现
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// 创建新的SQLite数据库实例
    pub async fn new(url: &str, connect_timeout: Duration) -> Result<Self> {
        let pool = ConnectionManager::create_pool(url, connect_timeout).await?;
        ConnectionManager::validate_pool(&pool).await?;
        Ok(Self { pool })
    }

    /// 获取连接池引用
    /// 非法ID直接视为不存在
    fn is_valid_id(id: &str) -> bool {
        Uuid::try_parse(id).is_ok()
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn save_property(&self, property: NewProperty) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let document = PropertyDocument::from_new(property, Utc::now());
        PropertyQueries::insert(&self.pool, &id, &document).await?;
        Ok(id)
    }

    async fn get_property(&self, id: &str) -> Result<Option<PropertyRecord>> {
        if !Self::is_valid_id(id) {
            return Ok(None);
        }
        PropertyQueries::get_by_id(&self.pool, id).await
    }

    async fn list_properties(&self, limit: u32) -> Result<Vec<PropertyRecord>> {
        PropertyQueries::list(&self.pool, limit).await
    }

    async fn update_property(&self, id: &str, patch: &PropertyPatch) -> Result<u64> {
        if !Self::is_valid_id(id) {
            return Ok(0);
        }
        PropertyQueries::merge_patch(&self.pool, id, patch, Utc::now()).await
    }

    async fn delete_property(&self, id: &str) -> Result<u64> {
        if !Self::is_valid_id(id) {
            return Ok(0);
        }
        PropertyQueries::delete(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<bool> {
        HealthQueries::check_health(&self.pool).await
    }

    async fn initialize(&self) -> Result<()> {
        SchemaManager::create_all_tables(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
