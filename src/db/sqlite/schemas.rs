//! SQLite数据库表结构定义

use anyhow::Result;
use sqlx::SqlitePool;

/// 数据库表结构管理器
pub struct SchemaManager;

impl SchemaManager {
    /// 创建所有表结构
    pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
        Self::create_properties_table(pool).await?;
        Ok(())
    }

    /// 房源表：每行一个 JSON 文档
    async fn create_properties_table(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS properties (
                id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_properties_created_at
            ON properties(created_at)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
