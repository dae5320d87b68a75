use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::sqlite::SqliteDatabase;
use super::traits::Database;
use super::unavailable::UnavailableDatabase;
use crate::util::config::DatabaseConfig;
use crate::util::logging::standards::events;

/// 创建数据库实例并初始化表结构
pub async fn create_database(config: &DatabaseConfig) -> Result<Arc<dyn Database>> {
    let timeout = Duration::from_secs(config.connect_timeout_secs);
    let db = SqliteDatabase::new(&config.url, timeout)
        .await
        .with_context(|| format!("failed to open property store {}", config.url))?;
    db.initialize()
        .await
        .context("failed to initialise property store schema")?;

    info!(
        target: "db.sqlite",
        event = events::STORE_CONNECTED,
        url = %config.url,
        "房源库连接成功"
    );
    Ok(Arc::new(db))
}

/// 连接失败时退化为不可用实现，服务仍然启动
pub async fn create_database_or_unavailable(config: &DatabaseConfig) -> Arc<dyn Database> {
    match create_database(config).await {
        Ok(db) => db,
        Err(e) => {
            warn!(
                target: "db.sqlite",
                event = events::STORE_UNAVAILABLE,
                url = %config.url,
                error = %format!("{:#}", e),
                "房源库不可用，所有存储操作将返回错误"
            );
            Arc::new(UnavailableDatabase::new(format!("{:#}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_sqlite_database() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };

        let db = create_database(&config).await.unwrap();
        assert!(db.health_check().await.unwrap());
        assert_eq!(db.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn test_unreachable_store_degrades() {
        let dir = tempfile::tempdir().unwrap();
        // 目录本身不能作为数据库文件打开
        let config = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().display()),
            connect_timeout_secs: 1,
            ..Default::default()
        };

        let db = create_database_or_unavailable(&config).await;
        assert_eq!(db.backend_name(), "unavailable");
        assert!(db.list_properties(10).await.is_err());
    }
}
