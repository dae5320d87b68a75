//! SQLite数据库查询操作

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::model::{PropertyDocument, PropertyPatch, PropertyRecord};

/// 房源查询操作
pub struct PropertyQueries;

impl PropertyQueries {
    pub async fn insert(pool: &SqlitePool, id: &str, document: &PropertyDocument) -> Result<()> {
        let json = serde_json::to_string(document).context("failed to encode property")?;

        sqlx::query(
            r#"
            INSERT INTO properties (id, document, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(json)
        .bind(document.created_at.to_rfc3339())
        .bind(document.updated_at.to_rfc3339())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<Option<PropertyRecord>> {
        let row = sqlx::query("SELECT id, document FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.map(|r| Self::row_to_record(&r)).transpose()
    }

    pub async fn list(pool: &SqlitePool, limit: u32) -> Result<Vec<PropertyRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, document FROM properties
            ORDER BY rowid ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// 以 JSON Merge Patch 语义合并文档
    pub async fn merge_patch(
        pool: &SqlitePool,
        id: &str,
        patch: &PropertyPatch,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let patch = patch
            .clone()
            .set("updated_at", serde_json::to_value(now)?)
            .into_value();

        let result = sqlx::query(
            r#"
            UPDATE properties
            SET document = json_patch(document, ?), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.to_string())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn row_to_record(row: &SqliteRow) -> Result<PropertyRecord> {
        let id: String = row.try_get("id")?;
        let raw: String = row.try_get("document")?;
        let document: PropertyDocument = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt property document {}", id))?;
        Ok(PropertyRecord { id, document })
    }
}

/// 健康检查查询
pub struct HealthQueries;

impl HealthQueries {
    /// 执行健康检查
    pub async fn check_health(pool: &SqlitePool) -> Result<bool> {
        sqlx::query("SELECT 1")
            .fetch_one(pool)
            .await
            .map(|_| true)
            .map_err(|e| e.into())
    }
}
