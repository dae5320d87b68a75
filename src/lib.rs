use std::sync::Arc;

pub mod api;
pub mod build_info;
pub mod db;
pub mod model;
pub mod server;
pub mod storage;
pub mod util;

use util::config::Config;
use util::image::ImageStore;

/// 应用状态结构，启动时构建一次后克隆到各个处理器
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<dyn db::Database>,
    pub images: ImageStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        database: Arc<dyn db::Database>,
        storage: Arc<dyn storage::Storage>,
    ) -> Self {
        let images = ImageStore::new(storage, config.images.clone());
        Self {
            database,
            images,
            config: Arc::new(config),
        }
    }
}
