//! SQLite连接管理
//! 处理数据库连接池的创建和管理

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// SQLite连接管理器
pub struct ConnectionManager;

impl ConnectionManager {
    /// 根据连接串创建连接池，文件库会自动创建目录和文件
    pub async fn create_pool(url: &str, connect_timeout: Duration) -> Result<SqlitePool> {
        let in_memory = Self::is_memory_url(url);

        if !in_memory {
            if let Some(parent) = Self::file_path(url).and_then(|p| p.parent()) {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url: {}", url))?
            .create_if_missing(true);

        // 内存库每个连接各自独立，只能保留一个连接
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(connect_timeout);
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(5)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to {}", url))?;

        info!(target: "db.sqlite", "Successfully connected to SQLite database: {}", url);
        Ok(pool)
    }

    /// 验证连接池状态
    pub async fn validate_pool(pool: &SqlitePool) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(pool).await?;
        Ok(())
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }

    fn file_path(url: &str) -> Option<&Path> {
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or(rest);
        (!path.is_empty()).then(|| Path::new(path))
    }
}
