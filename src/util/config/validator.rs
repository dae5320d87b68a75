//! 配置验证模块

use super::types::*;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 全面验证配置
    pub fn validate_all(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_server_config(&config.server, &mut report);
        Self::validate_database_config(&config.database, &mut report);
        Self::validate_image_config(&config.images, &mut report);
        Self::validate_logging_config(&config.logging, &mut report);

        report
    }

    fn validate_server_config(server: &ServerConfig, report: &mut ValidationReport) {
        if server.port == 0 {
            report.add_error("server.port", "端口号不能为0");
        }
        if server.host.trim().is_empty() {
            report.add_error("server.host", "监听地址不能为空");
        }
    }

    fn validate_database_config(database: &DatabaseConfig, report: &mut ValidationReport) {
        if !database.url.starts_with("sqlite:") {
            report.add_error(
                "database.url",
                &format!("仅支持 sqlite 连接串: {}", database.url),
            );
        }
        if database.list_limit == 0 {
            report.add_error("database.list_limit", "列表上限必须大于0");
        }
        if database.connect_timeout_secs == 0 {
            report.add_warning("database.connect_timeout_secs", "连接超时为0，将立即失败");
        }
    }

    fn validate_image_config(images: &ImageConfig, report: &mut ValidationReport) {
        if images.max_size_mb == 0 {
            report.add_error("images.max_size_mb", "图片大小上限必须大于0");
        }
        if images.thumbnail_size == 0 {
            report.add_error("images.thumbnail_size", "缩略图尺寸必须大于0");
        }
        if !(1..=100).contains(&images.thumbnail_quality) {
            report.add_error("images.thumbnail_quality", "缩略图质量必须在1-100之间");
        }
        if !images.public_prefix.starts_with('/') || images.public_prefix.trim_end_matches('/').is_empty() {
            report.add_error("images.public_prefix", "静态路径必须以 / 开头且不能为根路径");
        }
    }

    fn validate_logging_config(logging: &LoggingConfig, report: &mut ValidationReport) {
        if !VALID_LEVELS.contains(&logging.level.as_str()) {
            report.add_warning(
                "logging.level",
                &format!("未知日志级别 {}，将回退为 info", logging.level),
            );
        }
        if logging.file.enabled && logging.file.directory.trim().is_empty() {
            report.add_error("logging.file.directory", "启用文件日志时目录不能为空");
        }
    }
}

/// 验证报告
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// 验证问题
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}
