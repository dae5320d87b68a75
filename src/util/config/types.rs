//! 配置数据结构定义

use serde::{Deserialize, Serialize};

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// 房源库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx 连接串，`sqlite::memory:` 用于测试
    pub url: String,
    /// 列表接口单次读取上限
    pub list_limit: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:runtime/data/properties.db".to_string(),
            list_limit: 100,
            connect_timeout_secs: 5,
        }
    }
}

/// 图片上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub upload_dir: String,
    /// 静态文件挂载路径
    pub public_prefix: String,
    pub max_size_mb: u64,
    /// 缩略图最长边（像素）
    pub thumbnail_size: u32,
    pub thumbnail_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            public_prefix: "/uploads".to_string(),
            max_size_mb: 5,
            thumbnail_size: 200,
            thumbnail_quality: 85,
        }
    }
}

impl ImageConfig {
    pub fn max_size_bytes(&self) -> usize {
        (self.max_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// 是否输出 JSON 结构化日志
    pub structured: bool,
    pub file: LogFileConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
            file: LogFileConfig::default(),
        }
    }
}

/// 日志文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileConfig {
    pub enabled: bool,
    pub directory: String,
    pub retention_days: Option<u32>,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: "runtime/logs".to_string(),
            retention_days: Some(7),
        }
    }
}

/// 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 为空或包含 "*" 时允许任意来源
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}
