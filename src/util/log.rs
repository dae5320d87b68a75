use crate::util::config::LoggingConfig;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::EnvFilter, Layer, Registry};

/// 访问日志单独写文件时使用的 target
pub const ACCESS_TARGET: &str = "http.server";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

static ACCESS_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// 初始化日志：控制台 + 可选的按天滚动文件（主日志与访问日志分开）
pub fn log_init_with_config(
    file_prefix: &str,
    config: &LoggingConfig,
) -> anyhow::Result<Option<WorkerGuard>> {
    let level_filter = parse_level(&config.level);
    let level = level_filter_to_str(level_filter);
    let use_json = config.structured;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(stdout_layer(use_json, env_filter(level, level)));

    let mut guard = None;
    let mut log_dir = None;

    if config.file.enabled {
        let dir = resolve_log_dir(&config.file.directory);
        std::fs::create_dir_all(&dir)?;

        let file_appender = daily(&dir, format!("{}-info.log", file_prefix));
        let (main_writer, main_guard) = tracing_appender::non_blocking(file_appender);
        let access_appender = daily(&dir, format!("{}-access.log", file_prefix));
        let (access_writer, access_guard) = tracing_appender::non_blocking(access_appender);
        let _ = ACCESS_GUARD.set(access_guard);

        let main_filter = main_file_filter(level);
        let access_filter = env_filter(&format!("{}={}", ACCESS_TARGET, level), "off");

        if use_json {
            layers.push(
                layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(main_writer)
                    .with_filter(main_filter)
                    .boxed(),
            );
            layers.push(
                layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(access_writer)
                    .with_filter(access_filter)
                    .boxed(),
            );
        } else {
            layers.push(
                layer()
                    .with_ansi(false)
                    .with_writer(main_writer)
                    .with_filter(main_filter)
                    .boxed(),
            );
            layers.push(
                layer()
                    .with_ansi(false)
                    .with_writer(access_writer)
                    .with_filter(access_filter)
                    .boxed(),
            );
        }

        guard = Some(main_guard);
        log_dir = Some(dir);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    tracing::info!(
        event = "log.init",
        level = %level,
        file = config.file.enabled,
        directory = ?log_dir,
        rotation = "daily",
        structured = use_json,
    );

    if let (Some(dir), Some(days)) = (log_dir.as_ref(), config.file.retention_days) {
        tracing::info!(event = "log.retention", days);
        if let Err(e) = cleanup_old_logs(dir, file_prefix, days) {
            tracing::warn!(event = "log.cleanup_failed", error = %e);
        }
    }

    Ok(guard)
}

fn stdout_layer(use_json: bool, filter: EnvFilter) -> BoxedLayer {
    if use_json {
        layer()
            .json()
            .with_writer(io::stdout)
            .with_filter(filter)
            .boxed()
    } else {
        layer()
            .with_target(true)
            .with_writer(io::stdout)
            .with_filter(filter)
            .boxed()
    }
}

/// 主日志文件排除访问日志 target
pub(crate) fn main_file_filter(level: &str) -> EnvFilter {
    env_filter(&format!("{},{}=off", level, ACCESS_TARGET), level)
}

fn env_filter(expression: &str, fallback: &str) -> EnvFilter {
    EnvFilter::try_new(expression).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// 相对路径基于当前目录；在 bin 目录中运行时取上级目录
fn resolve_log_dir(directory: &str) -> PathBuf {
    let path = Path::new(directory);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base = if current_dir.file_name() == Some(std::ffi::OsStr::new("bin")) {
        current_dir.parent().map(Path::to_path_buf).unwrap_or(current_dir)
    } else {
        current_dir
    };
    base.join(path)
}

/// 删除超过保留天数的日志文件，只处理带前缀的日志
pub fn cleanup_old_logs(log_dir: &Path, file_prefix: &str, retention_days: u32) -> anyhow::Result<usize> {
    if !log_dir.exists() {
        tracing::debug!("日志目录不存在: {}", log_dir.display());
        return Ok(0);
    }

    let retention = std::time::Duration::from_secs(u64::from(retention_days) * 24 * 60 * 60);
    let cutoff = std::time::SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(std::time::UNIX_EPOCH);

    let mut deleted_count = 0;
    let mut error_count = 0;

    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        if !file_name.starts_with(file_prefix) {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata
            .modified()
            .unwrap_or_else(|_| std::time::SystemTime::now());
        if modified < cutoff {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    deleted_count += 1;
                    tracing::debug!("已删除过期日志: {}", path.display());
                }
                Err(e) => {
                    error_count += 1;
                    tracing::warn!("删除日志文件失败: {} - {}", path.display(), e);
                }
            }
        }
    }

    if deleted_count > 0 {
        tracing::info!("已清理 {} 个过期日志文件", deleted_count);
    }
    if error_count > 0 {
        tracing::warn!("有 {} 个文件清理失败", error_count);
    }

    Ok(deleted_count)
}

/// 日志目录是否存在且可写
pub fn check_log_dir_writable(log_dir: &Path) -> bool {
    if !log_dir.exists() {
        return false;
    }
    let test_file = log_dir.join(".write_test");
    let ok = std::fs::write(&test_file, "test").is_ok();
    if ok {
        let _ = std::fs::remove_file(&test_file);
    }
    ok
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn level_filter_to_str(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::OFF => "off",
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
    }
}
