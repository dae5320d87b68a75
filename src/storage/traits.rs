use anyhow::Result;
use async_trait::async_trait;

/// 存储操作trait
#[async_trait]
pub trait Storage: Send + Sync {
    /// 存储文件
    async fn put(&self, key: &str, data: &[u8]) -> Result<()>;

    /// 获取文件，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 删除文件，不存在不算错误
    async fn delete(&self, key: &str) -> Result<()>;

    /// 获取文件的公开访问URL
    fn get_public_url(&self, key: &str) -> String;

    /// 健康检查
    async fn health_check(&self) -> Result<bool>;
}
