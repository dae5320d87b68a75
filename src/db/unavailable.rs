//! 启动时存储不可达时使用的占位实现

use anyhow::Result;
use async_trait::async_trait;

use super::traits::{Database, DatabaseError};
use crate::model::{NewProperty, PropertyPatch, PropertyRecord};

/// 所有操作都返回 [`DatabaseError::Unavailable`]
pub struct UnavailableDatabase {
    reason: String,
}

impl UnavailableDatabase {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(DatabaseError::Unavailable(self.reason.clone()).into())
    }
}

#[async_trait]
impl Database for UnavailableDatabase {
    async fn save_property(&self, _property: NewProperty) -> Result<String> {
        self.fail()
    }

    async fn get_property(&self, _id: &str) -> Result<Option<PropertyRecord>> {
        self.fail()
    }

    async fn list_properties(&self, _limit: u32) -> Result<Vec<PropertyRecord>> {
        self.fail()
    }

    async fn update_property(&self, _id: &str, _patch: &PropertyPatch) -> Result<u64> {
        self.fail()
    }

    async fn delete_property(&self, _id: &str) -> Result<u64> {
        self.fail()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}
