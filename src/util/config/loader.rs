//! 配置加载和管理模块
//! 处理配置文件的读取、写入以及环境变量覆盖

use super::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从YAML文件读取配置
    pub fn read_yaml(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&config_str)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// 依次查找 ./config/config.yaml 与 ./config.yaml
    pub fn find_config_file() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.exists())
    }

    pub fn candidate_paths() -> Vec<PathBuf> {
        vec![
            Path::new("config").join(CONFIG_FILE_NAME),
            PathBuf::from(CONFIG_FILE_NAME),
        ]
    }

    /// 读取配置；文件不存在时使用默认值并写出模板
    pub fn load() -> Result<(Config, Option<PathBuf>)> {
        let (config, path) = match Self::find_config_file() {
            Some(path) => (Self::read_yaml(&path)?, Some(path)),
            None => {
                let config = Config::default();
                let template = Path::new("config").join(CONFIG_FILE_NAME);
                // 模板写出失败不影响启动
                if let Err(e) = ConfigWriter::write_yaml_with_dir(&config, &template) {
                    eprintln!("无法写出配置模板 {}: {}", template.display(), e);
                }
                (config, None)
            }
        };

        Ok((Self::apply_env_overrides(config), path))
    }

    /// 从环境变量读取配置覆盖
    pub fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// 覆盖逻辑与环境变量来源解耦，便于测试
    pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("APP_HOST").filter(|v| !v.trim().is_empty()) {
            config.server.host = host.trim().to_string();
        }

        if let Some(port) = lookup("APP_PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => eprintln!("APP_PORT 无法解析为端口号: {}", port),
            }
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            config.database.url = url.trim().to_string();
        }

        if let Some(dir) = lookup("UPLOADS_DIR").filter(|v| !v.trim().is_empty()) {
            config.images.upload_dir = dir.trim().to_string();
        }

        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            config.logging.level = level.trim().to_ascii_lowercase();
        }

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        config
    }
}

/// 配置写入器
pub struct ConfigWriter;

impl ConfigWriter {
    /// 写入配置到指定路径，确保目录存在
    pub fn write_yaml_with_dir(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml_content = serde_yaml::to_string(config)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }
}
