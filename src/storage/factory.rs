use anyhow::Result;
use std::sync::Arc;

use super::local::LocalStorage;
use super::traits::Storage;
use crate::util::config::ImageConfig;

/// 创建图片存储实例，文件由 `public_prefix` 下的静态路由对外提供
pub fn create_storage(config: &ImageConfig) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(&config.upload_dir, &config.public_prefix)?;

    tracing::info!(
        target: "storage.local",
        "Local storage initialized at: {}",
        config.upload_dir
    );
    Ok(Arc::new(storage))
}
