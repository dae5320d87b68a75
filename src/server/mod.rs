//! 服务器模块
//!
//! - 配置管理 (config.rs)
//! - 数据库初始化 (database.rs)
//! - 存储系统初始化 (storage.rs)
//! - HTTP服务器设置 (http.rs)

pub mod config;
pub mod database;
pub mod http;
pub mod storage;

pub use config::ConfigManager;
pub use database::{DatabaseHealth, DatabaseInitializer};
pub use http::{HttpServer, ServerManager};
pub use storage::{StorageHealth, StorageInitializer};

use crate::build_info;
use crate::util::config::Config;
use crate::util::log::check_log_dir_writable;
use crate::util::logging::standards::events;
use crate::AppState;
use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// 服务器引导程序，统一的启动入口
pub struct ServerBootstrap {
    config: Config,
    _log_guard: Option<WorkerGuard>,
}

impl ServerBootstrap {
    /// 加载配置并初始化日志
    pub fn new() -> Result<Self> {
        let (config, path, report) = ConfigManager::load_and_validate()?;
        let log_guard = ConfigManager::initialize_logging(&config)?;
        ConfigManager::report_validation(&report, path.as_ref())?;

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    /// 启动服务器
    pub async fn start(self) -> Result<()> {
        info!(
            event = events::SERVER_STARTING,
            version = %build_info::summary(),
            host = %self.config.server.host,
            port = self.config.server.port,
            "=== 房源服务启动 ==="
        );

        let app_state = Self::create_app_state(self.config.clone()).await?;
        let server = ServerManager::create_server(&self.config.server, app_state).await?;
        ServerManager::start_server(server).await
    }

    /// 创建应用状态
    async fn create_app_state(config: Config) -> Result<AppState> {
        info!("[build] 创建应用状态...");

        let database = DatabaseInitializer::create_from_config(&config).await;
        let storage = StorageInitializer::create_from_config(&config).await?;

        info!("[ok] 应用状态创建完成");
        Ok(AppState::new(config, database, storage))
    }
}

/// 启动完整的服务器
pub async fn start_server() -> Result<()> {
    ServerBootstrap::new()?.start().await
}

/// 命令行健康检查结果
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub overall_healthy: bool,
    pub store_healthy: bool,
    pub uploads_healthy: bool,
    pub logs_writable: bool,
}

/// 检查存储、上传目录与日志目录
pub async fn check_system_health() -> Result<HealthReport> {
    let (config, _, _) = ConfigManager::load_and_validate()?;
    Ok(check_health_with(&config).await)
}

async fn check_health_with(config: &Config) -> HealthReport {
    let database = DatabaseInitializer::create_from_config(config).await;
    let store_healthy = DatabaseInitializer::check_health(&database).await.healthy;

    let uploads_healthy = match StorageInitializer::create_from_config(config).await {
        Ok(storage) => StorageInitializer::check_health(&storage).await.healthy,
        Err(_) => false,
    };

    let logs_writable =
        !config.logging.file.enabled || check_log_dir_writable(Path::new(&config.logging.file.directory));

    HealthReport {
        overall_healthy: store_healthy && uploads_healthy && logs_writable,
        store_healthy,
        uploads_healthy,
        logs_writable,
    }
}
