//! 数据库初始化模块
//! 负责根据配置创建房源库连接，连接失败时退化为不可用实现

use crate::db::{self, Database};
use crate::util::config::Config;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// 数据库健康状态
#[derive(Debug, Clone)]
pub struct DatabaseHealth {
    pub backend: &'static str,
    pub healthy: bool,
    pub error: Option<String>,
}

/// 数据库初始化器
pub struct DatabaseInitializer;

impl DatabaseInitializer {
    /// 根据配置创建数据库实例，连接只在启动时检查一次
    pub async fn create_from_config(config: &Config) -> Arc<dyn Database> {
        info!("[cabinet] 初始化房源库连接...");
        let database = db::create_database_or_unavailable(&config.database).await;
        info!(backend = database.backend_name(), "[ok] 数据库初始化完成");
        database
    }

    /// 检查数据库健康
    pub async fn check_health(database: &Arc<dyn Database>) -> DatabaseHealth {
        let backend = database.backend_name();
        match database.health_check().await {
            Ok(healthy) => DatabaseHealth {
                backend,
                healthy,
                error: None,
            },
            Err(e) => {
                warn!(backend, error = %e, "数据库健康检查失败");
                DatabaseHealth {
                    backend,
                    healthy: false,
                    error: Some(format!("{:#}", e)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_is_healthy() {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();

        let database = DatabaseInitializer::create_from_config(&config).await;
        let health = DatabaseInitializer::check_health(&database).await;
        assert_eq!(health.backend, "sqlite");
        assert!(health.healthy);
        assert!(health.error.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_store_reports_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.url = format!("sqlite:{}", dir.path().display());
        config.database.connect_timeout_secs = 1;

        let database = DatabaseInitializer::create_from_config(&config).await;
        let health = DatabaseInitializer::check_health(&database).await;
        assert_eq!(health.backend, "unavailable");
        assert!(!health.healthy);
    }
}
