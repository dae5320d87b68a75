//! 配置管理模块
//! 负责 .env 加载、配置文件读取、校验以及日志初始化

use crate::util::config::{Config, ConfigLoader, ConfigValidator, ValidationReport};
use crate::util::log::log_init_with_config;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// 日志文件前缀
pub const LOG_FILE_PREFIX: &str = "property-server";

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 加载 .env 与配置文件，返回配置、来源路径与校验报告
    pub fn load_and_validate() -> Result<(Config, Option<PathBuf>, ValidationReport)> {
        // .env 不存在是正常情况
        let dotenv_path = dotenvy::dotenv().ok();

        let (config, path) = ConfigLoader::load()?;
        let report = ConfigValidator::validate_all(&config);

        if let Some(dotenv_path) = dotenv_path {
            eprintln!("已加载环境文件: {}", dotenv_path.display());
        }

        Ok((config, path, report))
    }

    /// 初始化日志系统
    pub fn initialize_logging(config: &Config) -> Result<Option<WorkerGuard>> {
        log_init_with_config(LOG_FILE_PREFIX, &config.logging)
    }

    /// 在日志可用后输出校验结果；有错误时拒绝启动
    pub fn report_validation(report: &ValidationReport, path: Option<&PathBuf>) -> Result<()> {
        match path {
            Some(path) => info!("配置文件路径: {}", path.display()),
            None => warn!("[warn] 未找到配置文件，使用默认配置并写出模板 config/config.yaml"),
        }

        for issue in &report.warnings {
            warn!(field = %issue.field, "配置警告: {}", issue.message);
        }

        if report.has_errors() {
            for issue in &report.errors {
                tracing::error!(field = %issue.field, "配置错误: {}", issue.message);
            }
            return Err(anyhow::anyhow!(
                "配置验证失败: {} 个错误",
                report.errors.len()
            ));
        }

        info!("[ok] 配置加载完成");
        Ok(())
    }
}
