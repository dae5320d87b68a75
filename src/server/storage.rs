//! 存储系统初始化模块
//! 负责创建图片上传目录对应的本地存储

use crate::storage::{self, Storage};
use crate::util::config::Config;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

/// 存储健康状态
#[derive(Debug, Clone)]
pub struct StorageHealth {
    pub healthy: bool,
    pub error: Option<String>,
}

/// 存储系统初始化器
pub struct StorageInitializer;

impl StorageInitializer {
    /// 根据配置创建存储实例
    pub async fn create_from_config(config: &Config) -> Result<Arc<dyn Storage>> {
        info!("[storage] 初始化图片存储: {}", config.images.upload_dir);
        let storage = storage::create_storage(&config.images)
            .with_context(|| format!("无法创建上传目录 {}", config.images.upload_dir))?;

        Self::validate_connection(&storage).await?;
        Ok(storage)
    }

    /// 验证存储可读写
    pub async fn validate_connection(storage: &Arc<dyn Storage>) -> Result<()> {
        let health = Self::check_health(storage).await;
        if health.healthy {
            info!("[ok] 图片存储可用");
            Ok(())
        } else {
            let reason = health.error.unwrap_or_else(|| "unknown".to_string());
            error!("[fail] 图片存储不可用: {}", reason);
            Err(anyhow::anyhow!("图片存储不可用: {}", reason))
        }
    }

    pub async fn check_health(storage: &Arc<dyn Storage>) -> StorageHealth {
        match storage.health_check().await {
            Ok(healthy) => StorageHealth {
                healthy,
                error: None,
            },
            Err(e) => StorageHealth {
                healthy: false,
                error: Some(format!("{:#}", e)),
            },
        }
    }
}
